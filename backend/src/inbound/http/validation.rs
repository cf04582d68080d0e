//! Request validation helpers shared by HTTP handlers.

use serde_json::json;
use uuid::Uuid;

use crate::domain::Error;

/// Field names used in validation error details.
#[derive(Debug, Clone, Copy)]
pub enum FieldName {
    WordId,
    WordSetId,
}

impl FieldName {
    fn as_str(self) -> &'static str {
        match self {
            Self::WordId => "id",
            Self::WordSetId => "wordSet",
        }
    }
}

/// Parse a UUID path or query component, reporting the offending field.
pub fn parse_uuid(raw: &str, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(raw).map_err(|_| {
        Error::invalid_request(format!("{} must be a UUID", field.as_str()))
            .with_details(json!({ "field": field.as_str() }))
    })
}
