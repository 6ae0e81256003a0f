use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use diesel::result::DatabaseErrorKind;
use serde::{Deserialize, Serialize};

use crate::types::ApiErrorResponse;

/// Broad failure categories. Every [`ErrorCode`] belongs to exactly one kind
/// and the kind decides the HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    Validation,
    Duplicate,
    SelfReference,
    Forbidden,
    Conflict,
    Unauthorized,
    Internal,
}

impl ErrorKind {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Validation | Self::SelfReference => StatusCode::BAD_REQUEST,
            Self::Duplicate | Self::Conflict => StatusCode::CONFLICT,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Application error codes following the pattern E{area}{sequence}
///
/// Ranges:
/// - E0xxx: Shared/infrastructure errors
/// - E1xxx: User, profile, address and preference errors
/// - E2xxx: Match request errors
/// - E3xxx: Membership errors
/// - E4xxx: Profile view errors
/// - E5xxx: Messaging errors
/// - E6xxx: Report and staff errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Shared (E0xxx)
    InternalError,
    ValidationError,
    NotFound,
    Unauthorized,
    Forbidden,
    BadRequest,
    Conflict,
    TokenExpired,
    TokenInvalid,

    // Users & profiles (E1xxx)
    UserNotFound,
    EmailAlreadyExists,
    ProfileNotFound,
    NotProfileManager,
    AddressNotFound,
    DuplicateAddress,
    PreferenceNotFound,
    DuplicatePreference,
    InvalidPreferenceRange,

    // Match requests (E2xxx)
    MatchRequestNotFound,
    DuplicateMatchRequest,
    SelfMatchRequest,
    NotRequestRecipient,

    // Membership (E3xxx)
    MembershipNotFound,
    DuplicateMembership,
    NonPremiumMember,
    InvalidMembershipPeriod,

    // Profile views (E4xxx)
    CannotViewSelf,

    // Messaging (E5xxx)
    MessageNotFound,
    CannotMessageSelf,

    // Reports & staff (E6xxx)
    ReportNotFound,
    CannotReportSelf,
    DuplicateReport,
    ReportAlreadyReviewed,
    StaffNotFound,
    NotStaffMember,
}

impl ErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            // Shared
            Self::InternalError => "E0001",
            Self::ValidationError => "E0002",
            Self::NotFound => "E0003",
            Self::Unauthorized => "E0004",
            Self::Forbidden => "E0005",
            Self::BadRequest => "E0006",
            Self::Conflict => "E0007",
            Self::TokenExpired => "E0008",
            Self::TokenInvalid => "E0009",

            // Users & profiles
            Self::UserNotFound => "E1001",
            Self::EmailAlreadyExists => "E1002",
            Self::ProfileNotFound => "E1003",
            Self::NotProfileManager => "E1004",
            Self::AddressNotFound => "E1005",
            Self::DuplicateAddress => "E1006",
            Self::PreferenceNotFound => "E1007",
            Self::DuplicatePreference => "E1008",
            Self::InvalidPreferenceRange => "E1009",

            // Match requests
            Self::MatchRequestNotFound => "E2001",
            Self::DuplicateMatchRequest => "E2002",
            Self::SelfMatchRequest => "E2003",
            Self::NotRequestRecipient => "E2004",

            // Membership
            Self::MembershipNotFound => "E3001",
            Self::DuplicateMembership => "E3002",
            Self::NonPremiumMember => "E3003",
            Self::InvalidMembershipPeriod => "E3004",

            // Profile views
            Self::CannotViewSelf => "E4001",

            // Messaging
            Self::MessageNotFound => "E5001",
            Self::CannotMessageSelf => "E5002",

            // Reports & staff
            Self::ReportNotFound => "E6001",
            Self::CannotReportSelf => "E6002",
            Self::DuplicateReport => "E6003",
            Self::ReportAlreadyReviewed => "E6004",
            Self::StaffNotFound => "E6005",
            Self::NotStaffMember => "E6006",
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InternalError => ErrorKind::Internal,
            Self::ValidationError | Self::BadRequest | Self::InvalidPreferenceRange
            | Self::NotRequestRecipient | Self::InvalidMembershipPeriod => ErrorKind::Validation,
            Self::NotFound | Self::UserNotFound | Self::ProfileNotFound | Self::AddressNotFound
            | Self::PreferenceNotFound | Self::MatchRequestNotFound | Self::MembershipNotFound
            | Self::MessageNotFound | Self::ReportNotFound | Self::StaffNotFound => ErrorKind::NotFound,
            Self::Unauthorized | Self::TokenExpired | Self::TokenInvalid => ErrorKind::Unauthorized,
            Self::Forbidden | Self::NotProfileManager | Self::NonPremiumMember
            | Self::NotStaffMember => ErrorKind::Forbidden,
            Self::EmailAlreadyExists | Self::DuplicateAddress | Self::DuplicatePreference
            | Self::DuplicateMatchRequest | Self::DuplicateMembership
            | Self::DuplicateReport => ErrorKind::Duplicate,
            Self::SelfMatchRequest | Self::CannotViewSelf | Self::CannotMessageSelf
            | Self::CannotReportSelf => ErrorKind::SelfReference,
            Self::Conflict | Self::ReportAlreadyReviewed => ErrorKind::Conflict,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        self.kind().status_code()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    Known {
        code: ErrorCode,
        message: String,
        details: Option<serde_json::Value>,
    },

    #[error("internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Known {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(code: ErrorCode, message: impl Into<String>, details: serde_json::Value) -> Self {
        Self::Known {
            code,
            message: message.into(),
            details: Some(details),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadRequest, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Domain code carried by a `Known` error.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            AppError::Known { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Known { code, .. } => code.kind(),
            AppError::Internal(_) => ErrorKind::Internal,
            AppError::Database(err) => database_error_kind(err),
            AppError::Validation(_) => ErrorKind::Validation,
        }
    }
}

/// Store constraint violations surface as conflicts; a missing row is a
/// plain not-found.
fn database_error_kind(err: &diesel::result::Error) -> ErrorKind {
    match err {
        diesel::result::Error::NotFound => ErrorKind::NotFound,
        diesel::result::Error::DatabaseError(
            DatabaseErrorKind::UniqueViolation
            | DatabaseErrorKind::ForeignKeyViolation
            | DatabaseErrorKind::CheckViolation
            | DatabaseErrorKind::NotNullViolation,
            _,
        ) => ErrorKind::Conflict,
        _ => ErrorKind::Internal,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match &self {
            AppError::Known { code, message, details } => {
                let status = code.status_code();
                if status.is_server_error() {
                    tracing::error!(code = code.code(), "{message}");
                }
                let mut resp = ApiErrorResponse::new(code.code(), message);
                if let Some(d) = details {
                    resp = resp.with_details(d.clone());
                }
                (status, resp)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiErrorResponse::new(ErrorCode::InternalError.code(), "internal server error"),
                )
            }
            AppError::Database(err) => match database_error_kind(err) {
                ErrorKind::NotFound => (
                    StatusCode::NOT_FOUND,
                    ApiErrorResponse::new(ErrorCode::NotFound.code(), "resource not found"),
                ),
                ErrorKind::Conflict => {
                    tracing::warn!(error = %err, "store constraint violated");
                    (
                        StatusCode::CONFLICT,
                        ApiErrorResponse::new(ErrorCode::Conflict.code(), "request conflicts with stored data"),
                    )
                }
                _ => {
                    tracing::error!(error = %err, "database error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        ApiErrorResponse::new(ErrorCode::InternalError.code(), "database error"),
                    )
                }
            },
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ApiErrorResponse::new(ErrorCode::ValidationError.code(), msg),
            ),
        };

        (status, Json(error_response)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
