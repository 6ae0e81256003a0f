use uuid::Uuid;

use milan_shared::{AppError, AppResult, ErrorCode};

use super::{profile_service, validate_input};
use crate::models::{Preference, PreferenceInput};
use crate::repository::Store;

pub fn get(store: &dyn Store, id: Uuid) -> AppResult<Preference> {
    store
        .preferences()
        .get_by_id(id)?
        .ok_or_else(|| AppError::new(ErrorCode::PreferenceNotFound, "preference not found"))
}

pub fn get_by_profile_id(store: &dyn Store, profile_id: Uuid) -> AppResult<Preference> {
    store
        .preferences()
        .find_by_profile(profile_id)?
        .ok_or_else(|| AppError::new(ErrorCode::PreferenceNotFound, "profile has no preference"))
}

fn check_ranges(input: &PreferenceInput) -> AppResult<()> {
    let inverted = |min: Option<i32>, max: Option<i32>| matches!((min, max), (Some(lo), Some(hi)) if lo > hi);

    if inverted(input.min_height_cm, input.max_height_cm) {
        return Err(AppError::new(
            ErrorCode::InvalidPreferenceRange,
            "min_height_cm must not exceed max_height_cm",
        ));
    }
    if inverted(input.min_age, input.max_age) {
        return Err(AppError::new(
            ErrorCode::InvalidPreferenceRange,
            "min_age must not exceed max_age",
        ));
    }
    Ok(())
}

fn from_input(id: Uuid, input: PreferenceInput) -> Preference {
    Preference {
        id,
        profile_id: input.profile_id,
        min_height_cm: input.min_height_cm,
        max_height_cm: input.max_height_cm,
        min_age: input.min_age,
        max_age: input.max_age,
        mother_tongue: input.mother_tongue,
        religion: input.religion,
        education: input.education,
        occupation: input.occupation,
        gender: input.gender,
    }
}

pub fn add(store: &dyn Store, input: PreferenceInput) -> AppResult<Preference> {
    validate_input(&input)?;
    check_ranges(&input)?;
    profile_service::get(store, input.profile_id)?;

    if store.preferences().find_by_profile(input.profile_id)?.is_some() {
        return Err(AppError::new(
            ErrorCode::DuplicatePreference,
            "profile already has a preference",
        ));
    }

    store.preferences().add(&from_input(Uuid::now_v7(), input))
}

pub fn update(store: &dyn Store, id: Uuid, input: PreferenceInput) -> AppResult<Preference> {
    validate_input(&input)?;
    check_ranges(&input)?;
    let existing = get(store, id)?;

    if input.profile_id != existing.profile_id {
        profile_service::get(store, input.profile_id)?;
        if store.preferences().find_by_profile(input.profile_id)?.is_some() {
            return Err(AppError::new(
                ErrorCode::DuplicatePreference,
                "profile already has a preference",
            ));
        }
    }

    store
        .preferences()
        .update(&from_input(id, input))?
        .ok_or_else(|| AppError::new(ErrorCode::PreferenceNotFound, "preference not found"))
}

pub fn delete(store: &dyn Store, id: Uuid) -> AppResult<()> {
    if !store.preferences().delete_by_id(id)? {
        return Err(AppError::new(ErrorCode::PreferenceNotFound, "preference not found"));
    }
    Ok(())
}
