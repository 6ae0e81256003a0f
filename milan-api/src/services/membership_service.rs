//! Membership lifecycle: CRUD, expiry validation and usage counters.
//!
//! Expiry is applied lazily, by [`validate`] on demand and by the periodic
//! sweep ([`validate_all`]). An expired paid membership falls back to
//! `FreeUser`; an expired trial only has `is_trial_ended` set and keeps its type.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use milan_shared::{AppError, AppResult, ErrorCode};

use super::profile_service;
use crate::models::{Membership, MembershipInput, MembershipType};
use crate::repository::Store;

/// What a validation pass did to one membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipChange {
    Unchanged,
    TrialEnded,
    Downgraded,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidatedMembership {
    pub membership: Membership,
    pub change: MembershipChange,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SweepSummary {
    pub checked: usize,
    pub downgraded: usize,
    pub trials_ended: usize,
    /// Memberships that were rewritten, for event publication.
    #[serde(skip)]
    pub changed: Vec<ValidatedMembership>,
}

/// Which usage counter to bump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageCounter {
    Views,
    ViewersViews,
    Chats,
    Requests,
}

pub fn get(store: &dyn Store, id: Uuid) -> AppResult<Membership> {
    store
        .memberships()
        .get_by_id(id)?
        .ok_or_else(|| AppError::new(ErrorCode::MembershipNotFound, "membership not found"))
}

pub fn get_by_profile_id(store: &dyn Store, profile_id: Uuid) -> AppResult<Membership> {
    store
        .memberships()
        .find_by_profile(profile_id)?
        .ok_or_else(|| AppError::new(ErrorCode::MembershipNotFound, "profile has no membership"))
}

/// Memberships of every profile the user manages.
pub fn get_by_user_id(store: &dyn Store, user_id: Uuid) -> AppResult<Vec<Membership>> {
    let mut memberships = Vec::new();
    for profile in store.profiles().managed_by(user_id)? {
        if let Some(membership) = store.memberships().find_by_profile(profile.id)? {
            memberships.push(membership);
        }
    }
    Ok(memberships)
}

fn check_period(input: &MembershipInput) -> AppResult<()> {
    if input.ends_at < input.starts_at {
        return Err(AppError::new(
            ErrorCode::InvalidMembershipPeriod,
            "ends_at must not be before starts_at",
        ));
    }
    Ok(())
}

fn ensure_free_slot(store: &dyn Store, profile_id: Uuid) -> AppResult<()> {
    profile_service::get(store, profile_id)?;
    if store.memberships().find_by_profile(profile_id)?.is_some() {
        return Err(AppError::new(
            ErrorCode::DuplicateMembership,
            "profile already has a membership",
        ));
    }
    Ok(())
}

pub fn add(store: &dyn Store, input: MembershipInput) -> AppResult<Membership> {
    check_period(&input)?;
    ensure_free_slot(store, input.profile_id)?;

    let membership = store.memberships().add(&Membership {
        id: Uuid::now_v7(),
        profile_id: input.profile_id,
        membership_type: input.membership_type,
        starts_at: input.starts_at,
        ends_at: input.ends_at,
        is_trial: input.is_trial,
        is_trial_ended: input.is_trial_ended,
        views_count: 0,
        viewers_view_count: 0,
        chats_count: 0,
        requests_count: 0,
        created_at: Utc::now(),
    })?;

    tracing::info!(
        membership_id = %membership.id,
        profile_id = %membership.profile_id,
        membership_type = %membership.membership_type,
        "membership created"
    );
    Ok(membership)
}

/// Replace type, period and trial flags. Usage counters carry over.
pub fn update(store: &dyn Store, id: Uuid, input: MembershipInput) -> AppResult<Membership> {
    check_period(&input)?;
    let existing = get(store, id)?;
    if input.profile_id != existing.profile_id {
        ensure_free_slot(store, input.profile_id)?;
    }

    let replacement = Membership {
        profile_id: input.profile_id,
        membership_type: input.membership_type,
        starts_at: input.starts_at,
        ends_at: input.ends_at,
        is_trial: input.is_trial,
        is_trial_ended: input.is_trial_ended,
        ..existing
    };

    store
        .memberships()
        .update(&replacement)?
        .ok_or_else(|| AppError::new(ErrorCode::MembershipNotFound, "membership not found"))
}

pub fn delete(store: &dyn Store, id: Uuid) -> AppResult<()> {
    if !store.memberships().delete_by_id(id)? {
        return Err(AppError::new(ErrorCode::MembershipNotFound, "membership not found"));
    }
    Ok(())
}

/// Apply the expiry rule in place.
fn apply_expiry(membership: &mut Membership, now: DateTime<Utc>) -> MembershipChange {
    if !membership.is_expired_at(now) {
        return MembershipChange::Unchanged;
    }

    if membership.is_trial {
        if membership.is_trial_ended {
            return MembershipChange::Unchanged;
        }
        membership.is_trial_ended = true;
        MembershipChange::TrialEnded
    } else {
        if membership.membership_type == MembershipType::Free {
            return MembershipChange::Unchanged;
        }
        membership.membership_type = MembershipType::Free;
        MembershipChange::Downgraded
    }
}

fn persist_change(store: &dyn Store, mut membership: Membership, now: DateTime<Utc>) -> AppResult<ValidatedMembership> {
    let change = apply_expiry(&mut membership, now);
    if change == MembershipChange::Unchanged {
        return Ok(ValidatedMembership { membership, change });
    }

    let membership = store
        .memberships()
        .update(&membership)?
        .ok_or_else(|| AppError::new(ErrorCode::MembershipNotFound, "membership not found"))?;

    match change {
        MembershipChange::Downgraded => {
            metrics::counter!("memberships_downgraded_total").increment(1);
            tracing::info!(membership_id = %membership.id, "expired membership downgraded to free");
        }
        MembershipChange::TrialEnded => {
            tracing::info!(membership_id = %membership.id, "trial membership ended");
        }
        MembershipChange::Unchanged => {}
    }

    Ok(ValidatedMembership { membership, change })
}

pub fn validate(store: &dyn Store, id: Uuid) -> AppResult<ValidatedMembership> {
    validate_at(store, id, Utc::now())
}

pub fn validate_at(store: &dyn Store, id: Uuid, now: DateTime<Utc>) -> AppResult<ValidatedMembership> {
    let membership = get(store, id)?;
    persist_change(store, membership, now)
}

pub fn validate_all(store: &dyn Store) -> AppResult<SweepSummary> {
    validate_all_at(store, Utc::now())
}

pub fn validate_all_at(store: &dyn Store, now: DateTime<Utc>) -> AppResult<SweepSummary> {
    let mut summary = SweepSummary::default();

    for membership in store.memberships().get_all()? {
        summary.checked += 1;
        let validated = persist_change(store, membership, now)?;
        match validated.change {
            MembershipChange::Unchanged => continue,
            MembershipChange::Downgraded => summary.downgraded += 1,
            MembershipChange::TrialEnded => summary.trials_ended += 1,
        }
        summary.changed.push(validated);
    }

    Ok(summary)
}

/// Read-modify-write increment of one counter on the profile's membership.
/// Profiles without a membership are skipped.
pub fn bump_usage(store: &dyn Store, profile_id: Uuid, counter: UsageCounter) -> AppResult<()> {
    let Some(mut membership) = store.memberships().find_by_profile(profile_id)? else {
        return Ok(());
    };

    let slot = match counter {
        UsageCounter::Views => &mut membership.views_count,
        UsageCounter::ViewersViews => &mut membership.viewers_view_count,
        UsageCounter::Chats => &mut membership.chats_count,
        UsageCounter::Requests => &mut membership.requests_count,
    };
    *slot = slot.saturating_add(1);

    store.memberships().update(&membership)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use milan_shared::ErrorKind;

    use crate::test_support::{membership_fixture, seed_membership, seed_profile, store_with_profile};

    fn input(profile_id: Uuid, membership_type: MembershipType) -> MembershipInput {
        let now = Utc::now();
        MembershipInput {
            profile_id,
            membership_type,
            starts_at: now,
            ends_at: now + Duration::days(90),
            is_trial: false,
            is_trial_ended: false,
        }
    }

    #[test]
    fn expired_premium_becomes_free() {
        let (store, _, profile) = store_with_profile();
        let yesterday = Utc::now() - Duration::days(1);
        let membership = store
            .memberships()
            .add(&membership_fixture(profile.id, MembershipType::Premium, yesterday))
            .unwrap();

        let validated = validate(&store, membership.id).unwrap();

        assert_eq!(validated.change, MembershipChange::Downgraded);
        assert_eq!(validated.membership.membership_type, MembershipType::Free);
        assert_eq!(get(&store, membership.id).unwrap().membership_type, MembershipType::Free);
    }

    #[test]
    fn expired_trial_keeps_type_and_ends_trial() {
        let (store, _, profile) = store_with_profile();
        let mut trial = membership_fixture(profile.id, MembershipType::Basic, Utc::now() - Duration::hours(2));
        trial.is_trial = true;
        let trial = store.memberships().add(&trial).unwrap();

        let validated = validate(&store, trial.id).unwrap();
        assert_eq!(validated.change, MembershipChange::TrialEnded);

        let stored = get(&store, trial.id).unwrap();
        assert!(stored.is_trial_ended);
        assert_eq!(stored.membership_type, MembershipType::Basic);

        assert_eq!(validate(&store, trial.id).unwrap().change, MembershipChange::Unchanged);
    }

    #[test]
    fn current_membership_is_untouched() {
        let (store, _, profile) = store_with_profile();
        let membership = seed_membership(&store, profile.id, MembershipType::Premium);

        let validated = validate(&store, membership.id).unwrap();
        assert_eq!(validated.change, MembershipChange::Unchanged);
        assert_eq!(validated.membership, membership);
    }

    #[test]
    fn validate_missing_is_not_found() {
        let (store, _, _) = store_with_profile();
        let err = validate(&store, Uuid::now_v7()).unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::MembershipNotFound));
    }

    #[test]
    fn sweep_counts_each_kind_of_change() {
        let (store, user, profile) = store_with_profile();
        let now = Utc::now();
        let past = now - Duration::days(3);

        store
            .memberships()
            .add(&membership_fixture(profile.id, MembershipType::Basic, past))
            .unwrap();

        let trial_profile = seed_profile(&store, user.id);
        let mut trial = membership_fixture(trial_profile.id, MembershipType::Premium, past);
        trial.is_trial = true;
        store.memberships().add(&trial).unwrap();

        let current = seed_profile(&store, user.id);
        seed_membership(&store, current.id, MembershipType::Premium);

        let summary = validate_all_at(&store, now).unwrap();
        assert_eq!(summary.checked, 3);
        assert_eq!(summary.downgraded, 1);
        assert_eq!(summary.trials_ended, 1);
        assert_eq!(summary.changed.len(), 2);

        let again = validate_all_at(&store, now).unwrap();
        assert_eq!((again.downgraded, again.trials_ended), (0, 0));
    }

    #[test]
    fn add_enforces_profile_period_and_uniqueness() {
        let (store, _, profile) = store_with_profile();

        let err = add(&store, input(Uuid::now_v7(), MembershipType::Basic)).unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::ProfileNotFound));

        let mut backwards = input(profile.id, MembershipType::Basic);
        backwards.ends_at = backwards.starts_at - Duration::days(1);
        let err = add(&store, backwards).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let added = add(&store, input(profile.id, MembershipType::Basic)).unwrap();
        assert_eq!(get_by_profile_id(&store, profile.id).unwrap(), added);

        let err = add(&store, input(profile.id, MembershipType::Premium)).unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::DuplicateMembership));
    }

    #[test]
    fn update_keeps_counters() {
        let (store, _, profile) = store_with_profile();
        let membership = add(&store, input(profile.id, MembershipType::Basic)).unwrap();
        bump_usage(&store, profile.id, UsageCounter::Chats).unwrap();

        let updated = update(&store, membership.id, input(profile.id, MembershipType::Premium)).unwrap();
        assert_eq!(updated.membership_type, MembershipType::Premium);
        assert_eq!(updated.chats_count, 1);
        assert_eq!(updated.created_at, membership.created_at);
    }

    #[test]
    fn memberships_by_user_span_managed_profiles() {
        let (store, user, profile) = store_with_profile();
        let second = seed_profile(&store, user.id);
        seed_profile(&store, user.id);
        let a = seed_membership(&store, profile.id, MembershipType::Basic);
        let b = seed_membership(&store, second.id, MembershipType::Premium);

        assert_eq!(get_by_user_id(&store, user.id).unwrap(), vec![a, b]);
        assert!(get_by_user_id(&store, Uuid::now_v7()).unwrap().is_empty());
    }

    #[test]
    fn bump_usage_touches_one_counter_and_skips_missing() {
        let (store, _, profile) = store_with_profile();
        seed_membership(&store, profile.id, MembershipType::Basic);

        bump_usage(&store, profile.id, UsageCounter::Views).unwrap();
        bump_usage(&store, profile.id, UsageCounter::Views).unwrap();
        bump_usage(&store, profile.id, UsageCounter::Requests).unwrap();
        bump_usage(&store, Uuid::now_v7(), UsageCounter::Views).unwrap();

        let membership = get_by_profile_id(&store, profile.id).unwrap();
        assert_eq!(membership.views_count, 2);
        assert_eq!(membership.requests_count, 1);
        assert_eq!(membership.viewers_view_count, 0);
        assert_eq!(membership.chats_count, 0);
    }

    #[test]
    fn delete_then_missing() {
        let (store, _, profile) = store_with_profile();
        let membership = seed_membership(&store, profile.id, MembershipType::Basic);
        delete(&store, membership.id).unwrap();
        assert_eq!(delete(&store, membership.id).unwrap_err().code(), Some(ErrorCode::MembershipNotFound));
    }
}
