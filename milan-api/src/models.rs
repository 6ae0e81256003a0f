use chrono::{DateTime, Datelike, NaiveDate, Utc};
use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::pg::{Pg, PgValue};
use diesel::prelude::*;
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use serde::{Deserialize, Serialize};
use std::io::Write;
use uuid::Uuid;
use validator::Validate;

use crate::schema::{
    addresses, match_requests, memberships, messages, preferences, profile_views, profiles,
    reports, staff, users,
};

// --- User ---

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable, Insertable, AsChangeset, Serialize, Deserialize)]
#[diesel(table_name = users, check_for_backend(Pg), treat_none_as_null = true)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UserInput {
    #[validate(email(message = "invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, max = 120))]
    pub full_name: String,
    #[validate(length(min = 5, max = 32))]
    pub phone: Option<String>,
}

// --- Staff ---

pub mod staff_roles {
    pub const MODERATOR: &str = "moderator";
    pub const ADMIN: &str = "admin";
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable, Insertable, AsChangeset, Serialize, Deserialize)]
#[diesel(table_name = staff, check_for_backend(Pg), treat_none_as_null = true)]
pub struct Staff {
    pub id: Uuid,
    pub user_id: Uuid,
    pub full_name: String,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StaffInput {
    pub user_id: Uuid,
    #[validate(length(min = 1, max = 120))]
    pub full_name: String,
    #[validate(email(message = "invalid email format"))]
    pub email: String,
    pub role: String,
}

// --- Profile ---

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable, Insertable, AsChangeset, Serialize, Deserialize)]
#[diesel(table_name = profiles, check_for_backend(Pg), treat_none_as_null = true)]
pub struct Profile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub marital_status: String,
    pub mother_tongue: Option<String>,
    pub religion: Option<String>,
    pub ethnicity: Option<String>,
    pub education: Option<String>,
    pub occupation: Option<String>,
    pub height_cm: Option<i32>,
    pub weight_kg: Option<i32>,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Age in completed years on `today`.
    pub fn age_on(&self, today: NaiveDate) -> i32 {
        let dob = self.date_of_birth;
        let mut age = today.year() - dob.year();
        if (today.month(), today.day()) < (dob.month(), dob.day()) {
            age -= 1;
        }
        age
    }
}

/// Body of profile create and full-replace update requests.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProfileInput {
    pub user_id: Uuid,
    #[validate(length(min = 1, max = 60))]
    pub first_name: String,
    #[validate(length(min = 1, max = 60))]
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    #[validate(length(min = 1, max = 20))]
    pub gender: String,
    #[validate(length(min = 1, max = 20))]
    pub marital_status: String,
    pub mother_tongue: Option<String>,
    pub religion: Option<String>,
    pub ethnicity: Option<String>,
    pub education: Option<String>,
    pub occupation: Option<String>,
    #[validate(range(min = 50, max = 260))]
    pub height_cm: Option<i32>,
    #[validate(range(min = 20, max = 400))]
    pub weight_kg: Option<i32>,
    #[validate(length(max = 2000))]
    pub bio: Option<String>,
}

// --- Address ---

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable, Insertable, AsChangeset, Serialize, Deserialize)]
#[diesel(table_name = addresses, check_for_backend(Pg), treat_none_as_null = true)]
pub struct Address {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub line1: String,
    pub city: String,
    pub state: Option<String>,
    pub country: String,
    pub postal_code: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddressInput {
    pub profile_id: Uuid,
    #[validate(length(min = 1, max = 200))]
    pub line1: String,
    #[validate(length(min = 1, max = 80))]
    pub city: String,
    pub state: Option<String>,
    #[validate(length(min = 1, max = 80))]
    pub country: String,
    pub postal_code: Option<String>,
}

// --- Preference ---

#[derive(Debug, Clone, PartialEq, Default, Queryable, Selectable, Identifiable, Insertable, AsChangeset, Serialize, Deserialize)]
#[diesel(table_name = preferences, check_for_backend(Pg), treat_none_as_null = true)]
pub struct Preference {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub min_height_cm: Option<i32>,
    pub max_height_cm: Option<i32>,
    pub min_age: Option<i32>,
    pub max_age: Option<i32>,
    pub mother_tongue: Option<String>,
    pub religion: Option<String>,
    pub education: Option<String>,
    pub occupation: Option<String>,
    pub gender: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PreferenceInput {
    pub profile_id: Uuid,
    #[validate(range(min = 50, max = 260))]
    pub min_height_cm: Option<i32>,
    #[validate(range(min = 50, max = 260))]
    pub max_height_cm: Option<i32>,
    #[validate(range(min = 18, max = 120))]
    pub min_age: Option<i32>,
    #[validate(range(min = 18, max = 120))]
    pub max_age: Option<i32>,
    pub mother_tongue: Option<String>,
    pub religion: Option<String>,
    pub education: Option<String>,
    pub occupation: Option<String>,
    pub gender: Option<String>,
}

// --- Membership ---

/// Subscription tier. Stored and serialized as `FreeUser`, `BasicUser`, `PremiumUser`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsExpression, FromSqlRow)]
#[diesel(sql_type = Text)]
pub enum MembershipType {
    #[serde(rename = "FreeUser")]
    Free,
    #[serde(rename = "BasicUser")]
    Basic,
    #[serde(rename = "PremiumUser")]
    Premium,
}

impl MembershipType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipType::Free => "FreeUser",
            MembershipType::Basic => "BasicUser",
            MembershipType::Premium => "PremiumUser",
        }
    }
}

impl std::fmt::Display for MembershipType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MembershipType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FreeUser" => Ok(MembershipType::Free),
            "BasicUser" => Ok(MembershipType::Basic),
            "PremiumUser" => Ok(MembershipType::Premium),
            _ => Err(format!("unknown membership type: {s}")),
        }
    }
}

impl ToSql<Text, Pg> for MembershipType {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Pg> for MembershipType {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        let raw = <String as FromSql<Text, Pg>>::from_sql(bytes)?;
        raw.parse().map_err(Into::into)
    }
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable, Insertable, AsChangeset, Serialize, Deserialize)]
#[diesel(table_name = memberships, check_for_backend(Pg), treat_none_as_null = true)]
pub struct Membership {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub membership_type: MembershipType,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub is_trial: bool,
    pub is_trial_ended: bool,
    pub views_count: i32,
    pub viewers_view_count: i32,
    pub chats_count: i32,
    pub requests_count: i32,
    pub created_at: DateTime<Utc>,
}

impl Membership {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.ends_at < now
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MembershipInput {
    pub profile_id: Uuid,
    pub membership_type: MembershipType,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    #[serde(default)]
    pub is_trial: bool,
    #[serde(default)]
    pub is_trial_ended: bool,
}

// --- MatchRequest ---

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable, Insertable, AsChangeset, Serialize, Deserialize)]
#[diesel(table_name = match_requests, check_for_backend(Pg), treat_none_as_null = true)]
pub struct MatchRequest {
    pub id: Uuid,
    pub sent_profile_id: Uuid,
    pub received_profile_id: Uuid,
    pub receiver_like: bool,
    pub is_rejected: bool,
    pub found_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
}

// --- ProfileView ---

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable, Insertable, AsChangeset, Serialize, Deserialize)]
#[diesel(table_name = profile_views, check_for_backend(Pg))]
pub struct ProfileView {
    pub id: Uuid,
    pub viewer_profile_id: Uuid,
    pub viewed_profile_id: Uuid,
    pub viewed_at: DateTime<Utc>,
}

// --- Message ---

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable, Insertable, AsChangeset, Serialize, Deserialize)]
#[diesel(table_name = messages, check_for_backend(Pg))]
pub struct Message {
    pub id: Uuid,
    pub sender_profile_id: Uuid,
    pub receiver_profile_id: Uuid,
    pub content: String,
    pub sent_at: DateTime<Utc>,
    pub is_read: bool,
}

impl Message {
    /// The other participant, seen from `profile_id`.
    pub fn partner_of(&self, profile_id: Uuid) -> Uuid {
        if self.sender_profile_id == profile_id {
            self.receiver_profile_id
        } else {
            self.sender_profile_id
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct MessageInput {
    pub sender_profile_id: Uuid,
    pub receiver_profile_id: Uuid,
    #[validate(length(min = 1, max = 2000, message = "message must be 1 to 2000 characters"))]
    pub content: String,
}

/// One conversation as seen by a profile; computed, not stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chat {
    pub partner_profile_id: Uuid,
    pub last_message: Message,
    pub unread_count: usize,
}

// --- Report ---

pub mod report_status {
    pub const PENDING: &str = "pending";
    pub const REVIEWED: &str = "reviewed";
    pub const DISMISSED: &str = "dismissed";
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable, Insertable, AsChangeset, Serialize, Deserialize)]
#[diesel(table_name = reports, check_for_backend(Pg), treat_none_as_null = true)]
pub struct Report {
    pub id: Uuid,
    pub reporter_profile_id: Uuid,
    pub reported_profile_id: Uuid,
    pub reason: String,
    pub details: Option<String>,
    pub status: String,
    pub reviewed_by: Option<Uuid>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Report {
    pub fn is_pending(&self) -> bool {
        self.status == report_status::PENDING
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReportInput {
    pub reporter_profile_id: Uuid,
    pub reported_profile_id: Uuid,
    #[validate(length(min = 1, max = 120))]
    pub reason: String,
    #[validate(length(max = 4000))]
    pub details: Option<String>,
}
