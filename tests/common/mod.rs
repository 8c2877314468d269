#![allow(dead_code)]

use std::sync::Once;

use smartfilter::SearchFieldRegistry;

static LOGGING: Once = Once::new();

/// Route crate logging to the test writer; `RUST_LOG=smartfilter=trace` shows it.
pub fn init_logging() {
    LOGGING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Hosts search on name and description; groups and inventories on name.
pub fn fields() -> SearchFieldRegistry {
    init_logging();
    SearchFieldRegistry::new()
        .with_model("host", ["name", "description"])
        .with_model("groups", ["name", "description"])
        .with_model("inventory", ["name"])
}
