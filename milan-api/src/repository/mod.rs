//! Persistence seam.
//!
//! [`Repository`] is the generic get/add/update/delete contract every table
//! honours. The per-entity traits add the lookups services need; their
//! default bodies are linear scans over `get_all`, which the in-memory
//! backend inherits and the Postgres backend overrides with filtered queries.

pub mod memory;
pub mod postgres;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use milan_shared::AppResult;

use crate::models::{
    Address, MatchRequest, Membership, Message, Preference, Profile, ProfileView, Report, Staff,
    User,
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// A row addressable by its UUID primary key.
pub trait Entity: Clone + Send + Sync + 'static {
    fn id(&self) -> Uuid;
}

macro_rules! entity {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Entity for $ty {
                fn id(&self) -> Uuid {
                    self.id
                }
            }
        )+
    };
}

entity!(User, Staff, Profile, Address, Preference, Membership, MatchRequest, ProfileView, Message, Report);

pub trait Repository<E: Entity>: Send + Sync {
    fn get_by_id(&self, id: Uuid) -> AppResult<Option<E>>;

    fn get_all(&self) -> AppResult<Vec<E>>;

    fn add(&self, entity: &E) -> AppResult<E>;

    /// Full replace keyed by `entity.id()`. `None` when no such row exists.
    fn update(&self, entity: &E) -> AppResult<Option<E>>;

    /// `true` when a row was removed.
    fn delete_by_id(&self, id: Uuid) -> AppResult<bool>;
}

pub trait UserRepository: Repository<User> {
    fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .get_all()?
            .into_iter()
            .find(|u| u.email.eq_ignore_ascii_case(email)))
    }
}

pub trait StaffRepository: Repository<Staff> {
    fn find_by_user(&self, user_id: Uuid) -> AppResult<Option<Staff>> {
        Ok(self.get_all()?.into_iter().find(|s| s.user_id == user_id))
    }
}

pub trait ProfileRepository: Repository<Profile> {
    fn managed_by(&self, user_id: Uuid) -> AppResult<Vec<Profile>> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|p| p.user_id == user_id)
            .collect())
    }
}

pub trait AddressRepository: Repository<Address> {
    fn find_by_profile(&self, profile_id: Uuid) -> AppResult<Option<Address>> {
        Ok(self.get_all()?.into_iter().find(|a| a.profile_id == profile_id))
    }
}

pub trait PreferenceRepository: Repository<Preference> {
    fn find_by_profile(&self, profile_id: Uuid) -> AppResult<Option<Preference>> {
        Ok(self.get_all()?.into_iter().find(|p| p.profile_id == profile_id))
    }
}

pub trait MembershipRepository: Repository<Membership> {
    fn find_by_profile(&self, profile_id: Uuid) -> AppResult<Option<Membership>> {
        Ok(self.get_all()?.into_iter().find(|m| m.profile_id == profile_id))
    }
}

pub trait MatchRequestRepository: Repository<MatchRequest> {
    fn find_pair(&self, sent_profile_id: Uuid, received_profile_id: Uuid) -> AppResult<Option<MatchRequest>> {
        Ok(self.get_all()?.into_iter().find(|r| {
            r.sent_profile_id == sent_profile_id && r.received_profile_id == received_profile_id
        }))
    }

    fn sent_by(&self, profile_id: Uuid) -> AppResult<Vec<MatchRequest>> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|r| r.sent_profile_id == profile_id)
            .collect())
    }

    fn received_by(&self, profile_id: Uuid) -> AppResult<Vec<MatchRequest>> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|r| r.received_profile_id == profile_id)
            .collect())
    }
}

pub trait ProfileViewRepository: Repository<ProfileView> {
    fn views_of(&self, viewed_profile_id: Uuid) -> AppResult<Vec<ProfileView>> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|v| v.viewed_profile_id == viewed_profile_id)
            .collect())
    }

    /// Remove every view older than `before`; returns how many went.
    fn delete_before(&self, before: DateTime<Utc>) -> AppResult<usize> {
        let mut deleted = 0;
        for view in self.get_all()?.into_iter().filter(|v| v.viewed_at < before) {
            if self.delete_by_id(view.id)? {
                deleted += 1;
            }
        }
        Ok(deleted)
    }
}

pub trait MessageRepository: Repository<Message> {
    fn involving(&self, profile_id: Uuid) -> AppResult<Vec<Message>> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|m| m.sender_profile_id == profile_id || m.receiver_profile_id == profile_id)
            .collect())
    }

    fn between(&self, a: Uuid, b: Uuid) -> AppResult<Vec<Message>> {
        Ok(self
            .involving(a)?
            .into_iter()
            .filter(|m| m.partner_of(a) == b)
            .collect())
    }
}

pub trait ReportRepository: Repository<Report> {
    fn find_pending(&self, reporter_profile_id: Uuid, reported_profile_id: Uuid) -> AppResult<Option<Report>> {
        Ok(self.get_all()?.into_iter().find(|r| {
            r.reporter_profile_id == reporter_profile_id
                && r.reported_profile_id == reported_profile_id
                && r.is_pending()
        }))
    }
}

/// One repository per entity plus the operations that must span tables.
pub trait Store: Send + Sync {
    fn users(&self) -> &dyn UserRepository;
    fn staff(&self) -> &dyn StaffRepository;
    fn profiles(&self) -> &dyn ProfileRepository;
    fn addresses(&self) -> &dyn AddressRepository;
    fn preferences(&self) -> &dyn PreferenceRepository;
    fn memberships(&self) -> &dyn MembershipRepository;
    fn match_requests(&self) -> &dyn MatchRequestRepository;
    fn profile_views(&self) -> &dyn ProfileViewRepository;
    fn messages(&self) -> &dyn MessageRepository;
    fn reports(&self) -> &dyn ReportRepository;

    /// Delete a profile together with its membership, preference and
    /// address, all or nothing. `false` when the profile does not exist.
    fn delete_profile_cascade(&self, profile_id: Uuid) -> AppResult<bool>;

    /// Cheap connectivity probe for the health endpoint.
    fn ping(&self) -> AppResult<()>;
}
