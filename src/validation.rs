use crate::error::AppError;

/// Parse a numeric id taken from a path segment or query parameter.
pub fn parse_id(field: &'static str, raw: &str) -> Result<i64, AppError> {
    if raw.is_empty() {
        return Err(AppError::InvalidInput {
            field,
            reason: "missing".into(),
        });
    }
    raw.parse::<i64>().map_err(|_| AppError::InvalidInput {
        field,
        reason: format!("not a number: '{raw}'"),
    })
}
