use crate::error::{AppError, AppResult};
use crate::models::SubscriptionRequest;

/// Checks the shape of a create/update body before any store call.
///
/// An end month earlier than the start month is accepted: such a record is stored
/// as-is and simply never overlaps a summary window.
pub fn validate_subscription(request: &SubscriptionRequest) -> AppResult<()> {
    if request.service_name.trim().is_empty() {
        return Err(AppError::ValidationError(
            "service_name must not be empty".to_string(),
        ));
    }
    if request.price <= 0 {
        return Err(AppError::ValidationError(
            "price must be a positive integer".to_string(),
        ));
    }
    if request.user_id.is_nil() {
        return Err(AppError::ValidationError("invalid user_id".to_string()));
    }
    validate_month_year("start", request.start_month, request.start_year)?;

    match (request.end_month, request.end_year) {
        (None, None) => Ok(()),
        (Some(month), Some(year)) => validate_month_year("end", month, year),
        _ => Err(AppError::ValidationError(
            "end_month and end_year must be provided together".to_string(),
        )),
    }
}

fn validate_month_year(label: &str, month: i32, year: i32) -> AppResult<()> {
    if !(1..=12).contains(&month) || year <= 0 {
        return Err(AppError::ValidationError(format!(
            "invalid {label} month/year"
        )));
    }
    Ok(())
}
