use chrono::Utc;
use uuid::Uuid;

use milan_shared::{AppError, AppResult, ErrorCode};

use super::{user_service, validate_input};
use crate::models::{staff_roles, Staff, StaffInput};
use crate::repository::Store;

fn check_role(role: &str) -> AppResult<()> {
    match role {
        staff_roles::MODERATOR | staff_roles::ADMIN => Ok(()),
        other => Err(AppError::new(
            ErrorCode::ValidationError,
            format!("unknown staff role: {other}"),
        )),
    }
}

pub fn get(store: &dyn Store, id: Uuid) -> AppResult<Staff> {
    store
        .staff()
        .get_by_id(id)?
        .ok_or_else(|| AppError::new(ErrorCode::StaffNotFound, "staff member not found"))
}

pub fn list(store: &dyn Store) -> AppResult<Vec<Staff>> {
    store.staff().get_all()
}

/// The staff record of an acting user; `NotStaffMember` when there is none.
pub fn require_staff(store: &dyn Store, user_id: Uuid) -> AppResult<Staff> {
    store
        .staff()
        .find_by_user(user_id)?
        .ok_or_else(|| AppError::new(ErrorCode::NotStaffMember, "acting user is not a staff member"))
}

pub fn add(store: &dyn Store, input: StaffInput) -> AppResult<Staff> {
    validate_input(&input)?;
    check_role(&input.role)?;
    user_service::get(store, input.user_id)?;

    if store.staff().find_by_user(input.user_id)?.is_some() {
        return Err(AppError::new(ErrorCode::Conflict, "user is already a staff member"));
    }

    let staff = store.staff().add(&Staff {
        id: Uuid::now_v7(),
        user_id: input.user_id,
        full_name: input.full_name,
        email: input.email.to_lowercase(),
        role: input.role,
        created_at: Utc::now(),
    })?;

    tracing::info!(staff_id = %staff.id, role = %staff.role, "staff member added");
    Ok(staff)
}

pub fn update(store: &dyn Store, id: Uuid, input: StaffInput) -> AppResult<Staff> {
    validate_input(&input)?;
    check_role(&input.role)?;
    let existing = get(store, id)?;

    if input.user_id != existing.user_id {
        user_service::get(store, input.user_id)?;
        if store.staff().find_by_user(input.user_id)?.is_some() {
            return Err(AppError::new(ErrorCode::Conflict, "user is already a staff member"));
        }
    }

    let replacement = Staff {
        id,
        user_id: input.user_id,
        full_name: input.full_name,
        email: input.email.to_lowercase(),
        role: input.role,
        created_at: existing.created_at,
    };

    store
        .staff()
        .update(&replacement)?
        .ok_or_else(|| AppError::new(ErrorCode::StaffNotFound, "staff member not found"))
}

pub fn delete(store: &dyn Store, id: Uuid) -> AppResult<()> {
    if !store.staff().delete_by_id(id)? {
        return Err(AppError::new(ErrorCode::StaffNotFound, "staff member not found"));
    }
    Ok(())
}
