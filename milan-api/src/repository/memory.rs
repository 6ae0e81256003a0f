use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use uuid::Uuid;

use milan_shared::{AppError, AppResult, ErrorCode};

use super::{
    AddressRepository, Entity, MatchRequestRepository, MembershipRepository, MessageRepository,
    PreferenceRepository, ProfileRepository, ProfileViewRepository, ReportRepository, Repository,
    StaffRepository, Store, UserRepository,
};
use crate::models::{
    Address, MatchRequest, Membership, Message, Preference, Profile, ProfileView, Report, Staff,
    User,
};

/// A table kept in process memory. Rows are keyed by UUIDv7, so iteration
/// order is insertion order.
pub struct MemoryTable<E: Entity> {
    rows: RwLock<BTreeMap<Uuid, E>>,
}

impl<E: Entity> Default for MemoryTable<E> {
    fn default() -> Self {
        Self {
            rows: RwLock::new(BTreeMap::new()),
        }
    }
}

impl<E: Entity> MemoryTable<E> {
    fn read(&self) -> AppResult<RwLockReadGuard<'_, BTreeMap<Uuid, E>>> {
        self.rows
            .read()
            .map_err(|_| AppError::internal("memory table lock poisoned"))
    }

    fn write(&self) -> AppResult<RwLockWriteGuard<'_, BTreeMap<Uuid, E>>> {
        self.rows
            .write()
            .map_err(|_| AppError::internal("memory table lock poisoned"))
    }
}

impl<E: Entity> Repository<E> for MemoryTable<E> {
    fn get_by_id(&self, id: Uuid) -> AppResult<Option<E>> {
        Ok(self.read()?.get(&id).cloned())
    }

    fn get_all(&self) -> AppResult<Vec<E>> {
        Ok(self.read()?.values().cloned().collect())
    }

    fn add(&self, entity: &E) -> AppResult<E> {
        let mut rows = self.write()?;
        if rows.contains_key(&entity.id()) {
            return Err(AppError::new(ErrorCode::Conflict, "a row with this id already exists"));
        }
        rows.insert(entity.id(), entity.clone());
        Ok(entity.clone())
    }

    fn update(&self, entity: &E) -> AppResult<Option<E>> {
        let mut rows = self.write()?;
        match rows.get_mut(&entity.id()) {
            Some(row) => {
                *row = entity.clone();
                Ok(Some(entity.clone()))
            }
            None => Ok(None),
        }
    }

    fn delete_by_id(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.write()?.remove(&id).is_some())
    }
}

impl UserRepository for MemoryTable<User> {}
impl StaffRepository for MemoryTable<Staff> {}
impl ProfileRepository for MemoryTable<Profile> {}
impl AddressRepository for MemoryTable<Address> {}
impl PreferenceRepository for MemoryTable<Preference> {}
impl MembershipRepository for MemoryTable<Membership> {}
impl MatchRequestRepository for MemoryTable<MatchRequest> {}
impl ProfileViewRepository for MemoryTable<ProfileView> {}
impl MessageRepository for MemoryTable<Message> {}
impl ReportRepository for MemoryTable<Report> {}

#[derive(Default)]
pub struct MemoryStore {
    users: MemoryTable<User>,
    staff: MemoryTable<Staff>,
    profiles: MemoryTable<Profile>,
    addresses: MemoryTable<Address>,
    preferences: MemoryTable<Preference>,
    memberships: MemoryTable<Membership>,
    match_requests: MemoryTable<MatchRequest>,
    profile_views: MemoryTable<ProfileView>,
    messages: MemoryTable<Message>,
    reports: MemoryTable<Report>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    fn staff(&self) -> &dyn StaffRepository {
        &self.staff
    }

    fn profiles(&self) -> &dyn ProfileRepository {
        &self.profiles
    }

    fn addresses(&self) -> &dyn AddressRepository {
        &self.addresses
    }

    fn preferences(&self) -> &dyn PreferenceRepository {
        &self.preferences
    }

    fn memberships(&self) -> &dyn MembershipRepository {
        &self.memberships
    }

    fn match_requests(&self) -> &dyn MatchRequestRepository {
        &self.match_requests
    }

    fn profile_views(&self) -> &dyn ProfileViewRepository {
        &self.profile_views
    }

    fn messages(&self) -> &dyn MessageRepository {
        &self.messages
    }

    fn reports(&self) -> &dyn ReportRepository {
        &self.reports
    }

    fn delete_profile_cascade(&self, profile_id: Uuid) -> AppResult<bool> {
        // Lock order: owned rows first, profile last.
        let mut memberships = self.memberships.write()?;
        let mut preferences = self.preferences.write()?;
        let mut addresses = self.addresses.write()?;
        let mut profiles = self.profiles.write()?;

        if !profiles.contains_key(&profile_id) {
            return Ok(false);
        }

        memberships.retain(|_, m| m.profile_id != profile_id);
        preferences.retain(|_, p| p.profile_id != profile_id);
        addresses.retain(|_, a| a.profile_id != profile_id);
        profiles.remove(&profile_id);
        Ok(true)
    }

    fn ping(&self) -> AppResult<()> {
        self.profiles.read().map(|_| ())
    }
}
