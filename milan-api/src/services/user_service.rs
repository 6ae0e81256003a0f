use chrono::Utc;
use uuid::Uuid;

use milan_shared::{AppError, AppResult, ErrorCode};

use super::validate_input;
use crate::models::{User, UserInput};
use crate::repository::Store;

pub fn get(store: &dyn Store, id: Uuid) -> AppResult<User> {
    store
        .users()
        .get_by_id(id)?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound, "user not found"))
}

/// Register a user. Emails are stored lowercased and must be unique.
pub fn add(store: &dyn Store, input: UserInput) -> AppResult<User> {
    validate_input(&input)?;
    let email = input.email.to_lowercase();

    if store.users().find_by_email(&email)?.is_some() {
        return Err(AppError::new(ErrorCode::EmailAlreadyExists, "email already registered"));
    }

    let now = Utc::now();
    let user = store.users().add(&User {
        id: Uuid::now_v7(),
        email,
        full_name: input.full_name,
        phone: input.phone,
        created_at: now,
        updated_at: now,
    })?;

    tracing::info!(user_id = %user.id, "user created");
    Ok(user)
}

pub fn update(store: &dyn Store, id: Uuid, input: UserInput) -> AppResult<User> {
    validate_input(&input)?;
    let existing = get(store, id)?;
    let email = input.email.to_lowercase();

    if let Some(other) = store.users().find_by_email(&email)? {
        if other.id != id {
            return Err(AppError::new(ErrorCode::EmailAlreadyExists, "email already registered"));
        }
    }

    let replacement = User {
        id,
        email,
        full_name: input.full_name,
        phone: input.phone,
        created_at: existing.created_at,
        updated_at: Utc::now(),
    };

    store
        .users()
        .update(&replacement)?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound, "user not found"))
}

/// Users still managing profiles cannot be removed.
pub fn delete(store: &dyn Store, id: Uuid) -> AppResult<()> {
    get(store, id)?;

    if !store.profiles().managed_by(id)?.is_empty() {
        return Err(AppError::new(
            ErrorCode::Conflict,
            "user still manages profiles; delete them first",
        ));
    }

    store.users().delete_by_id(id)?;
    tracing::info!(user_id = %id, "user deleted");
    Ok(())
}
