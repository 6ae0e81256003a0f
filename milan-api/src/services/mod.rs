pub mod address_service;
pub mod match_request_service;
pub mod membership_service;
pub mod message_service;
pub mod preference_service;
pub mod profile_service;
pub mod profile_view_service;
pub mod report_service;
pub mod staff_service;
pub mod user_service;

use validator::Validate;

use milan_shared::{AppError, AppResult, ErrorCode};

/// Run the derived `validator` rules on a request body.
pub(crate) fn validate_input<T: Validate>(input: &T) -> AppResult<()> {
    input
        .validate()
        .map_err(|e| AppError::new(ErrorCode::ValidationError, e.to_string()))
}
