use uuid::Uuid;

use milan_shared::{AppError, AppResult, ErrorCode};

use super::{profile_service, validate_input};
use crate::models::{Address, AddressInput};
use crate::repository::Store;

pub fn get(store: &dyn Store, id: Uuid) -> AppResult<Address> {
    store
        .addresses()
        .get_by_id(id)?
        .ok_or_else(|| AppError::new(ErrorCode::AddressNotFound, "address not found"))
}

pub fn get_by_profile_id(store: &dyn Store, profile_id: Uuid) -> AppResult<Address> {
    store
        .addresses()
        .find_by_profile(profile_id)?
        .ok_or_else(|| AppError::new(ErrorCode::AddressNotFound, "profile has no address"))
}

fn ensure_free_slot(store: &dyn Store, profile_id: Uuid) -> AppResult<()> {
    profile_service::get(store, profile_id)?;
    if store.addresses().find_by_profile(profile_id)?.is_some() {
        return Err(AppError::new(ErrorCode::DuplicateAddress, "profile already has an address"));
    }
    Ok(())
}

pub fn add(store: &dyn Store, input: AddressInput) -> AppResult<Address> {
    validate_input(&input)?;
    ensure_free_slot(store, input.profile_id)?;

    store.addresses().add(&Address {
        id: Uuid::now_v7(),
        profile_id: input.profile_id,
        line1: input.line1,
        city: input.city,
        state: input.state,
        country: input.country,
        postal_code: input.postal_code,
    })
}

pub fn update(store: &dyn Store, id: Uuid, input: AddressInput) -> AppResult<Address> {
    validate_input(&input)?;
    let existing = get(store, id)?;
    if input.profile_id != existing.profile_id {
        ensure_free_slot(store, input.profile_id)?;
    }

    store
        .addresses()
        .update(&Address {
            id,
            profile_id: input.profile_id,
            line1: input.line1,
            city: input.city,
            state: input.state,
            country: input.country,
            postal_code: input.postal_code,
        })?
        .ok_or_else(|| AppError::new(ErrorCode::AddressNotFound, "address not found"))
}

pub fn delete(store: &dyn Store, id: Uuid) -> AppResult<()> {
    if !store.addresses().delete_by_id(id)? {
        return Err(AppError::new(ErrorCode::AddressNotFound, "address not found"));
    }
    Ok(())
}
