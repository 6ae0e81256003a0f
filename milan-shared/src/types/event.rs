use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// RabbitMQ event envelope wrapping all domain events.
///
/// Routing key format: `milan.{entity}.{action}`
/// Example: `milan.match_request.approved`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event<T: Serialize> {
    pub id: Uuid,
    pub source: String,
    pub event_type: String,
    pub timestamp: DateTime<Utc>,
    pub correlation_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub data: T,
}

impl<T: Serialize> Event<T> {
    pub fn new(source: impl Into<String>, event_type: impl Into<String>, data: T) -> Self {
        Self {
            id: Uuid::now_v7(),
            source: source.into(),
            event_type: event_type.into(),
            timestamp: Utc::now(),
            correlation_id: None,
            user_id: None,
            data,
        }
    }

    pub fn with_user(mut self, user_id: Uuid) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn with_correlation(mut self, correlation_id: Uuid) -> Self {
        self.correlation_id = Some(correlation_id);
        self
    }
}

/// RabbitMQ routing keys
pub mod routing_keys {
    pub const PROFILE_CREATED: &str = "milan.profile.created";
    pub const PROFILE_DELETED: &str = "milan.profile.deleted";
    pub const PROFILE_VIEWED: &str = "milan.profile.viewed";

    pub const MATCH_REQUEST_SENT: &str = "milan.match_request.sent";
    pub const MATCH_REQUEST_APPROVED: &str = "milan.match_request.approved";
    pub const MATCH_REQUEST_REJECTED: &str = "milan.match_request.rejected";

    pub const MEMBERSHIP_DOWNGRADED: &str = "milan.membership.downgraded";
    pub const MEMBERSHIP_TRIAL_ENDED: &str = "milan.membership.trial_ended";

    pub const MESSAGE_SENT: &str = "milan.message.sent";

    pub const REPORT_CREATED: &str = "milan.report.created";
}

/// Event data payloads
pub mod payloads {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Serialize};
    use uuid::Uuid;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct ProfileCreated {
        pub profile_id: Uuid,
        pub user_id: Uuid,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct ProfileDeleted {
        pub profile_id: Uuid,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct ProfileViewed {
        pub view_id: Uuid,
        pub viewer_profile_id: Uuid,
        pub viewed_profile_id: Uuid,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct MatchRequestSent {
        pub match_request_id: Uuid,
        pub sent_profile_id: Uuid,
        pub received_profile_id: Uuid,
    }

    /// Shared by the approved and rejected routing keys.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct MatchRequestAnswered {
        pub match_request_id: Uuid,
        pub sent_profile_id: Uuid,
        pub received_profile_id: Uuid,
        pub receiver_like: bool,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct MembershipChanged {
        pub membership_id: Uuid,
        pub profile_id: Uuid,
        pub membership_type: String,
        pub ends_at: DateTime<Utc>,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct MessageSent {
        pub message_id: Uuid,
        pub sender_profile_id: Uuid,
        pub receiver_profile_id: Uuid,
        pub content_preview: String,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct ReportCreated {
        pub report_id: Uuid,
        pub reporter_profile_id: Uuid,
        pub reported_profile_id: Uuid,
    }
}
