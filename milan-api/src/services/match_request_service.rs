use chrono::Utc;
use uuid::Uuid;

use milan_shared::{AppError, AppResult, ErrorCode};

use super::membership_service::{self, UsageCounter};
use super::profile_service;
use crate::models::MatchRequest;
use crate::repository::Store;

pub fn get(store: &dyn Store, id: Uuid) -> AppResult<MatchRequest> {
    store
        .match_requests()
        .get_by_id(id)?
        .ok_or_else(|| AppError::new(ErrorCode::MatchRequestNotFound, "match request not found"))
}

/// Record a one-way request from `sender_id` to `target_id`.
pub fn send(store: &dyn Store, sender_id: Uuid, target_id: Uuid) -> AppResult<MatchRequest> {
    if sender_id == target_id {
        return Err(AppError::new(
            ErrorCode::SelfMatchRequest,
            "a profile cannot send a match request to itself",
        ));
    }

    profile_service::get(store, sender_id)?;
    profile_service::get(store, target_id)?;

    if store.match_requests().find_pair(sender_id, target_id)?.is_some() {
        return Err(AppError::new(
            ErrorCode::DuplicateMatchRequest,
            "match request already sent to this profile",
        ));
    }

    let request = store.match_requests().add(&MatchRequest {
        id: Uuid::now_v7(),
        sent_profile_id: sender_id,
        received_profile_id: target_id,
        receiver_like: false,
        is_rejected: false,
        found_at: Utc::now(),
        responded_at: None,
    })?;

    membership_service::bump_usage(store, sender_id, UsageCounter::Requests)?;
    metrics::counter!("match_requests_sent_total").increment(1);

    tracing::info!(
        match_request_id = %request.id,
        sent_profile_id = %sender_id,
        received_profile_id = %target_id,
        "match request sent"
    );
    Ok(request)
}

pub fn approve(store: &dyn Store, id: Uuid, profile_id: Uuid) -> AppResult<MatchRequest> {
    answer(store, id, profile_id, true)
}

pub fn reject(store: &dyn Store, id: Uuid, profile_id: Uuid) -> AppResult<MatchRequest> {
    answer(store, id, profile_id, false)
}

/// Only the receiving profile may answer; re-answering overwrites the previous answer.
fn answer(store: &dyn Store, id: Uuid, profile_id: Uuid, like: bool) -> AppResult<MatchRequest> {
    let mut request = get(store, id)?;

    if request.received_profile_id != profile_id {
        return Err(AppError::new(
            ErrorCode::NotRequestRecipient,
            "only the receiving profile can answer a match request",
        ));
    }

    request.receiver_like = like;
    request.is_rejected = !like;
    request.responded_at = Some(Utc::now());

    let request = store
        .match_requests()
        .update(&request)?
        .ok_or_else(|| AppError::new(ErrorCode::MatchRequestNotFound, "match request not found"))?;

    tracing::info!(match_request_id = %id, receiver_like = like, "match request answered");
    Ok(request)
}

/// Requests received by the profile.
pub fn received(store: &dyn Store, profile_id: Uuid) -> AppResult<Vec<MatchRequest>> {
    store.match_requests().received_by(profile_id)
}

pub fn sent(store: &dyn Store, profile_id: Uuid) -> AppResult<Vec<MatchRequest>> {
    store.match_requests().sent_by(profile_id)
}

/// Requests the profile sent that the receiver liked.
pub fn accepted(store: &dyn Store, profile_id: Uuid) -> AppResult<Vec<MatchRequest>> {
    Ok(store
        .match_requests()
        .sent_by(profile_id)?
        .into_iter()
        .filter(|r| r.receiver_like)
        .collect())
}

pub fn delete(store: &dyn Store, id: Uuid) -> AppResult<()> {
    if !store.match_requests().delete_by_id(id)? {
        return Err(AppError::new(ErrorCode::MatchRequestNotFound, "match request not found"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use milan_shared::ErrorKind;

    use crate::models::{MembershipType, Profile};
    use crate::repository::MemoryStore;
    use crate::test_support::{seed_membership, seed_profile, store_with_profile};

    fn pair() -> (MemoryStore, Profile, Profile) {
        let (store, user, a) = store_with_profile();
        let b = seed_profile(&store, user.id);
        (store, a, b)
    }

    #[test]
    fn approved_request_shows_up_as_accepted() {
        let (store, a, b) = pair();
        let request = send(&store, a.id, b.id).unwrap();

        approve(&store, request.id, b.id).unwrap();

        let accepted = accepted(&store, a.id).unwrap();
        assert_eq!(accepted.len(), 1);
        assert_eq!(accepted[0].received_profile_id, b.id);
        assert!(accepted[0].receiver_like);
        assert!(!accepted[0].is_rejected);
        assert!(accepted[0].responded_at.is_some());
    }

    #[test]
    fn self_request_is_rejected() {
        let (store, a, _) = pair();
        let err = send(&store, a.id, a.id).unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::SelfMatchRequest));
        assert_eq!(err.kind(), ErrorKind::SelfReference);
    }

    #[test]
    fn self_request_fails_even_for_unknown_ids() {
        let store = MemoryStore::new();
        let ghost = Uuid::now_v7();
        assert_eq!(send(&store, ghost, ghost).unwrap_err().kind(), ErrorKind::SelfReference);
    }

    #[test]
    fn second_request_to_same_target_is_duplicate() {
        let (store, a, b) = pair();
        send(&store, a.id, b.id).unwrap();

        let err = send(&store, a.id, b.id).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Duplicate);

        // The reverse direction is a separate edge.
        assert!(send(&store, b.id, a.id).is_ok());
    }

    #[test]
    fn only_the_receiver_may_answer() {
        let (store, a, b) = pair();
        let request = send(&store, a.id, b.id).unwrap();

        for outsider in [a.id, Uuid::now_v7()] {
            assert_eq!(approve(&store, request.id, outsider).unwrap_err().kind(), ErrorKind::Validation);
            assert_eq!(reject(&store, request.id, outsider).unwrap_err().kind(), ErrorKind::Validation);
        }

        let untouched = get(&store, request.id).unwrap();
        assert!(!untouched.receiver_like && !untouched.is_rejected);
    }

    #[test]
    fn reject_after_approve_flips_the_answer() {
        let (store, a, b) = pair();
        let request = send(&store, a.id, b.id).unwrap();
        approve(&store, request.id, b.id).unwrap();

        let rejected = reject(&store, request.id, b.id).unwrap();
        assert!(!rejected.receiver_like);
        assert!(rejected.is_rejected);
        assert!(accepted(&store, a.id).unwrap().is_empty());
    }

    #[test]
    fn answering_a_missing_request_is_not_found() {
        let (store, _, b) = pair();
        let err = approve(&store, Uuid::now_v7(), b.id).unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::MatchRequestNotFound));
    }

    #[test]
    fn unknown_target_is_not_found() {
        let (store, a, _) = pair();
        let err = send(&store, a.id, Uuid::now_v7()).unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::ProfileNotFound));
    }

    #[test]
    fn sent_and_received_listings() {
        let (store, a, b) = pair();
        let forward = send(&store, a.id, b.id).unwrap();

        assert_eq!(sent(&store, a.id).unwrap(), vec![forward.clone()]);
        assert_eq!(received(&store, b.id).unwrap(), vec![forward]);
        assert!(received(&store, a.id).unwrap().is_empty());
    }

    #[test]
    fn sending_counts_against_the_sender_membership() {
        let (store, a, b) = pair();
        seed_membership(&store, a.id, MembershipType::Basic);

        send(&store, a.id, b.id).unwrap();

        let membership = store.memberships().find_by_profile(a.id).unwrap().unwrap();
        assert_eq!(membership.requests_count, 1);
    }

    #[test]
    fn delete_removes_the_edge() {
        let (store, a, b) = pair();
        let request = send(&store, a.id, b.id).unwrap();

        delete(&store, request.id).unwrap();
        assert!(sent(&store, a.id).unwrap().is_empty());
        assert_eq!(delete(&store, request.id).unwrap_err().code(), Some(ErrorCode::MatchRequestNotFound));
    }
}
