//! Row builders shared by the unit tests.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use uuid::Uuid;

use crate::models::{Membership, MembershipType, Profile, User};
use crate::repository::{MemoryStore, Store};

pub fn user_fixture(email: &str) -> User {
    let now = Utc::now();
    User {
        id: Uuid::now_v7(),
        email: email.to_string(),
        full_name: "Meera Iyer".into(),
        phone: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn profile_fixture(user_id: Uuid) -> Profile {
    let now = Utc::now();
    Profile {
        id: Uuid::now_v7(),
        user_id,
        first_name: "Kavya".into(),
        last_name: "Nair".into(),
        date_of_birth: NaiveDate::from_ymd_opt(1994, 3, 12).unwrap_or_default(),
        gender: "female".into(),
        marital_status: "never_married".into(),
        mother_tongue: Some("malayalam".into()),
        religion: None,
        ethnicity: None,
        education: Some("masters".into()),
        occupation: Some("engineer".into()),
        height_cm: Some(162),
        weight_kg: None,
        bio: Some("Loves trekking and carnatic music.".into()),
        created_at: now,
        updated_at: now,
    }
}

pub fn membership_fixture(
    profile_id: Uuid,
    membership_type: MembershipType,
    ends_at: DateTime<Utc>,
) -> Membership {
    let now = Utc::now();
    Membership {
        id: Uuid::now_v7(),
        profile_id,
        membership_type,
        starts_at: ends_at - Duration::days(30),
        ends_at,
        is_trial: false,
        is_trial_ended: false,
        views_count: 0,
        viewers_view_count: 0,
        chats_count: 0,
        requests_count: 0,
        created_at: now,
    }
}

/// A store holding one user and one profile managed by that user.
pub fn store_with_profile() -> (MemoryStore, User, Profile) {
    let store = MemoryStore::new();
    let user = store.users().add(&user_fixture("owner@milan.test")).unwrap();
    let profile = store.profiles().add(&profile_fixture(user.id)).unwrap();
    (store, user, profile)
}

/// Add another profile managed by `user_id`.
pub fn seed_profile(store: &dyn Store, user_id: Uuid) -> Profile {
    store.profiles().add(&profile_fixture(user_id)).unwrap()
}

/// Attach a membership of `membership_type` ending a month from now.
pub fn seed_membership(store: &dyn Store, profile_id: Uuid, membership_type: MembershipType) -> Membership {
    store
        .memberships()
        .add(&membership_fixture(profile_id, membership_type, Utc::now() + Duration::days(30)))
        .unwrap()
}
