pub mod addresses;
pub mod health;
pub mod match_requests;
pub mod memberships;
pub mod messages;
pub mod preferences;
pub mod profile_views;
pub mod profiles;
pub mod reports;
pub mod staff;
pub mod users;

use uuid::Uuid;

use milan_shared::types::auth::AuthUser;
use milan_shared::{AppError, AppResult, ErrorCode};

use crate::repository::Store;
use crate::services::profile_service;

/// Account endpoints are open to the account holder and admins.
pub(crate) fn ensure_self_or_admin(auth: &AuthUser, user_id: Uuid) -> AppResult<()> {
    if auth.id != user_id && !auth.is_admin() {
        return Err(AppError::new(ErrorCode::Forbidden, "you may only act on your own account"));
    }
    Ok(())
}

/// Pass when the caller manages either profile of a two-sided record.
pub(crate) fn ensure_party(store: &dyn Store, auth: &AuthUser, first: Uuid, second: Uuid) -> AppResult<()> {
    if auth.is_staff() {
        return Ok(());
    }
    for profile_id in [first, second] {
        if let Some(profile) = store.profiles().get_by_id(profile_id)? {
            if profile.user_id == auth.id {
                return Ok(());
            }
        }
    }
    Err(AppError::new(
        ErrorCode::NotProfileManager,
        "you do not manage a profile involved in this record",
    ))
}

/// Shorthand used by handlers acting on behalf of one profile.
pub(crate) fn ensure_manager(store: &dyn Store, auth: &AuthUser, profile_id: Uuid) -> AppResult<()> {
    profile_service::ensure_manager(store, auth, profile_id).map(|_| ())
}

#[cfg(test)]
mod tests;
