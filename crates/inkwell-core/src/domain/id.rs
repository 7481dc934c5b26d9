//! Validation of identifiers handed over by the delivery layer as strings.

use uuid::Uuid;

use crate::error::DomainError;

/// Parse an opaque identifier, naming the offending field on failure.
pub fn parse_id(field: &'static str, raw: &str) -> Result<Uuid, DomainError> {
    Uuid::parse_str(raw.trim()).map_err(|_| DomainError::InvalidIdentifier {
        field,
        value: raw.to_string(),
    })
}
