use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use milan_shared::types::auth::AuthUser;
use milan_shared::types::pagination::{Paginated, PaginationParams};
use milan_shared::{AppError, AppResult, ErrorCode};

use super::{user_service, validate_input};
use crate::models::{Preference, Profile, ProfileInput};
use crate::repository::Store;

pub fn get(store: &dyn Store, id: Uuid) -> AppResult<Profile> {
    store
        .profiles()
        .get_by_id(id)?
        .ok_or_else(|| AppError::new(ErrorCode::ProfileNotFound, "profile not found"))
}

/// Load a profile the caller is allowed to act for: the managing user, or staff.
pub fn ensure_manager(store: &dyn Store, auth: &AuthUser, profile_id: Uuid) -> AppResult<Profile> {
    let profile = get(store, profile_id)?;
    if profile.user_id != auth.id && !auth.is_staff() {
        return Err(AppError::new(
            ErrorCode::NotProfileManager,
            "you do not manage this profile",
        ));
    }
    Ok(profile)
}

pub fn list(store: &dyn Store, params: &PaginationParams) -> AppResult<Paginated<Profile>> {
    Ok(params.paginate(store.profiles().get_all()?))
}

pub fn add(store: &dyn Store, input: ProfileInput) -> AppResult<Profile> {
    validate_input(&input)?;
    user_service::get(store, input.user_id)?;

    let now = Utc::now();
    let profile = store.profiles().add(&from_input(Uuid::now_v7(), input, now, now))?;

    tracing::info!(profile_id = %profile.id, user_id = %profile.user_id, "profile created");
    Ok(profile)
}

/// Full replace; id and creation time are kept.
pub fn update(store: &dyn Store, id: Uuid, input: ProfileInput) -> AppResult<Profile> {
    validate_input(&input)?;
    let existing = get(store, id)?;
    if input.user_id != existing.user_id {
        user_service::get(store, input.user_id)?;
    }

    let replacement = from_input(id, input, existing.created_at, Utc::now());
    store
        .profiles()
        .update(&replacement)?
        .ok_or_else(|| AppError::new(ErrorCode::ProfileNotFound, "profile not found"))
}

/// Removes the profile with its membership, preference and address.
pub fn delete(store: &dyn Store, id: Uuid) -> AppResult<()> {
    if !store.delete_profile_cascade(id)? {
        return Err(AppError::new(ErrorCode::ProfileNotFound, "profile not found"));
    }
    tracing::info!(profile_id = %id, "profile deleted");
    Ok(())
}

pub fn get_matches(store: &dyn Store, profile_id: Uuid) -> AppResult<Vec<Profile>> {
    get_matches_on(store, profile_id, Utc::now().date_naive())
}

/// Every other profile satisfying the preference of `profile_id`, with ages
/// computed on `today`. A profile without a preference matches everyone.
pub fn get_matches_on(store: &dyn Store, profile_id: Uuid, today: NaiveDate) -> AppResult<Vec<Profile>> {
    get(store, profile_id)?;
    let preference = store.preferences().find_by_profile(profile_id)?;

    let matches = store
        .profiles()
        .get_all()?
        .into_iter()
        .filter(|candidate| candidate.id != profile_id)
        .filter(|candidate| match &preference {
            Some(pref) => satisfies(pref, candidate, today),
            None => true,
        })
        .collect();

    Ok(matches)
}

fn satisfies(pref: &Preference, candidate: &Profile, today: NaiveDate) -> bool {
    text_matches(&pref.gender, Some(candidate.gender.as_str()))
        && text_matches(&pref.mother_tongue, candidate.mother_tongue.as_deref())
        && text_matches(&pref.religion, candidate.religion.as_deref())
        && text_matches(&pref.education, candidate.education.as_deref())
        && text_matches(&pref.occupation, candidate.occupation.as_deref())
        && in_range(pref.min_height_cm, pref.max_height_cm, candidate.height_cm)
        && in_range(pref.min_age, pref.max_age, Some(candidate.age_on(today)))
}

fn text_matches(wanted: &Option<String>, actual: Option<&str>) -> bool {
    match wanted {
        None => true,
        Some(wanted) => actual.is_some_and(|actual| actual.eq_ignore_ascii_case(wanted)),
    }
}

fn in_range(min: Option<i32>, max: Option<i32>, value: Option<i32>) -> bool {
    if min.is_none() && max.is_none() {
        return true;
    }
    value.is_some_and(|v| min.map_or(true, |lo| v >= lo) && max.map_or(true, |hi| v <= hi))
}

fn from_input(
    id: Uuid,
    input: ProfileInput,
    created_at: chrono::DateTime<Utc>,
    updated_at: chrono::DateTime<Utc>,
) -> Profile {
    Profile {
        id,
        user_id: input.user_id,
        first_name: input.first_name,
        last_name: input.last_name,
        date_of_birth: input.date_of_birth,
        gender: input.gender,
        marital_status: input.marital_status,
        mother_tongue: input.mother_tongue,
        religion: input.religion,
        ethnicity: input.ethnicity,
        education: input.education,
        occupation: input.occupation,
        height_cm: input.height_cm,
        weight_kg: input.weight_kg,
        bio: input.bio,
        created_at,
        updated_at,
    }
}
