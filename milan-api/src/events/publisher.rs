use uuid::Uuid;

use milan_shared::types::event::{payloads, routing_keys, Event};

use super::EventBus;
use crate::models::{MatchRequest, Message, Profile, ProfileView, Report};
use crate::services::membership_service::{MembershipChange, ValidatedMembership};

const SOURCE: &str = "milan-api";
const PREVIEW_CHARS: usize = 80;

pub async fn publish_profile_created(events: &EventBus, profile: &Profile) {
    let event = Event::new(
        SOURCE,
        routing_keys::PROFILE_CREATED,
        payloads::ProfileCreated {
            profile_id: profile.id,
            user_id: profile.user_id,
        },
    )
    .with_user(profile.user_id);

    events.publish(routing_keys::PROFILE_CREATED, event).await;
}

pub async fn publish_profile_deleted(events: &EventBus, profile_id: Uuid, acting_user: Uuid) {
    let event = Event::new(
        SOURCE,
        routing_keys::PROFILE_DELETED,
        payloads::ProfileDeleted { profile_id },
    )
    .with_user(acting_user);

    events.publish(routing_keys::PROFILE_DELETED, event).await;
}

pub async fn publish_profile_viewed(events: &EventBus, view: &ProfileView) {
    let event = Event::new(
        SOURCE,
        routing_keys::PROFILE_VIEWED,
        payloads::ProfileViewed {
            view_id: view.id,
            viewer_profile_id: view.viewer_profile_id,
            viewed_profile_id: view.viewed_profile_id,
        },
    );

    events.publish(routing_keys::PROFILE_VIEWED, event).await;
}

pub async fn publish_match_request_sent(events: &EventBus, request: &MatchRequest, acting_user: Uuid) {
    let event = Event::new(
        SOURCE,
        routing_keys::MATCH_REQUEST_SENT,
        payloads::MatchRequestSent {
            match_request_id: request.id,
            sent_profile_id: request.sent_profile_id,
            received_profile_id: request.received_profile_id,
        },
    )
    .with_user(acting_user);

    events.publish(routing_keys::MATCH_REQUEST_SENT, event).await;
}

pub async fn publish_match_request_answered(events: &EventBus, request: &MatchRequest, acting_user: Uuid) {
    let routing_key = if request.receiver_like {
        routing_keys::MATCH_REQUEST_APPROVED
    } else {
        routing_keys::MATCH_REQUEST_REJECTED
    };

    let event = Event::new(
        SOURCE,
        routing_key,
        payloads::MatchRequestAnswered {
            match_request_id: request.id,
            sent_profile_id: request.sent_profile_id,
            received_profile_id: request.received_profile_id,
            receiver_like: request.receiver_like,
        },
    )
    .with_user(acting_user);

    events.publish(routing_key, event).await;
}

/// Nothing is published for an unchanged membership.
pub async fn publish_membership_changed(events: &EventBus, validated: &ValidatedMembership) {
    let routing_key = match validated.change {
        MembershipChange::Unchanged => return,
        MembershipChange::Downgraded => routing_keys::MEMBERSHIP_DOWNGRADED,
        MembershipChange::TrialEnded => routing_keys::MEMBERSHIP_TRIAL_ENDED,
    };

    let membership = &validated.membership;
    let event = Event::new(
        SOURCE,
        routing_key,
        payloads::MembershipChanged {
            membership_id: membership.id,
            profile_id: membership.profile_id,
            membership_type: membership.membership_type.to_string(),
            ends_at: membership.ends_at,
        },
    );

    events.publish(routing_key, event).await;
}

pub async fn publish_message_sent(events: &EventBus, message: &Message, acting_user: Uuid) {
    let event = Event::new(
        SOURCE,
        routing_keys::MESSAGE_SENT,
        payloads::MessageSent {
            message_id: message.id,
            sender_profile_id: message.sender_profile_id,
            receiver_profile_id: message.receiver_profile_id,
            content_preview: message.content.chars().take(PREVIEW_CHARS).collect(),
        },
    )
    .with_user(acting_user);

    events.publish(routing_keys::MESSAGE_SENT, event).await;
}

pub async fn publish_report_created(events: &EventBus, report: &Report, acting_user: Uuid) {
    let event = Event::new(
        SOURCE,
        routing_keys::REPORT_CREATED,
        payloads::ReportCreated {
            report_id: report.id,
            reporter_profile_id: report.reporter_profile_id,
            reported_profile_id: report.reported_profile_id,
        },
    )
    .with_user(acting_user);

    events.publish(routing_keys::REPORT_CREATED, event).await;
}
