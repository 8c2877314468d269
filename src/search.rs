//! `search=` and `<relation>__search=` expansion into an OR over text fields.

use tracing::trace;

use crate::error::{FilterError, Result};
use crate::metadata::SearchFieldProvider;
use crate::predicate::{FieldPredicate, Predicate};
use crate::settings::FilterSettings;
use crate::value::TypedValue;

pub(crate) fn expand(
    provider: &dyn SearchFieldProvider,
    settings: &FilterSettings,
    relation: Option<&str>,
    value: TypedValue,
) -> Result<Predicate> {
    let model = relation.unwrap_or(settings.root_model.as_str());
    let fields = provider
        .search_fields(model)
        .ok_or_else(|| FilterError::UnknownRelation(model.to_string()))?;
    if fields.is_empty() {
        return Err(FilterError::NoSearchFields(model.to_string()));
    }

    trace!(model, fields = fields.len(), "expanding search");

    let members = fields
        .into_iter()
        .map(|field| {
            let path = match relation {
                Some(relation) => format!("{relation}{}{field}", settings.separator),
                None => field,
            };
            FieldPredicate::contains(path, value.clone())
        })
        .collect();

    Ok(Predicate::OrGroup(members))
}
