use chrono::{DateTime, Months, Utc};
use uuid::Uuid;

use milan_shared::{AppError, AppResult, ErrorCode};

use super::membership_service::{self, UsageCounter};
use super::profile_service;
use crate::models::{MembershipType, ProfileView};
use crate::repository::Store;

/// Basic members see this many of their most recent viewers.
const BASIC_VISIBLE_VIEWS: usize = 5;

pub fn add_view(store: &dyn Store, viewer_id: Uuid, viewed_id: Uuid) -> AppResult<ProfileView> {
    if viewer_id == viewed_id {
        return Err(AppError::new(ErrorCode::CannotViewSelf, "a profile cannot view itself"));
    }
    profile_service::get(store, viewer_id)?;
    profile_service::get(store, viewed_id)?;

    let view = store.profile_views().add(&ProfileView {
        id: Uuid::now_v7(),
        viewer_profile_id: viewer_id,
        viewed_profile_id: viewed_id,
        viewed_at: Utc::now(),
    })?;

    membership_service::bump_usage(store, viewer_id, UsageCounter::Views)?;
    metrics::counter!("profile_views_recorded_total").increment(1);

    tracing::debug!(view_id = %view.id, viewer = %viewer_id, viewed = %viewed_id, "profile view recorded");
    Ok(view)
}

pub fn get_views_by_profile_id(store: &dyn Store, profile_id: Uuid) -> AppResult<Vec<ProfileView>> {
    get_views_by_profile_id_at(store, profile_id, Utc::now())
}

/// Who viewed `profile_id`, gated on its membership tier:
/// Free or none is refused, Basic sees the five latest views of the past
/// calendar month, Premium sees everything. Always oldest first.
pub fn get_views_by_profile_id_at(
    store: &dyn Store,
    profile_id: Uuid,
    now: DateTime<Utc>,
) -> AppResult<Vec<ProfileView>> {
    profile_service::get(store, profile_id)?;

    let tier = store
        .memberships()
        .find_by_profile(profile_id)?
        .map(|m| m.membership_type);

    let mut views = store.profile_views().views_of(profile_id)?;
    views.sort_by_key(|v| v.viewed_at);

    let visible = match tier {
        None | Some(MembershipType::Free) => {
            return Err(AppError::new(
                ErrorCode::NonPremiumMember,
                "view history requires a paid membership",
            ));
        }
        Some(MembershipType::Basic) => {
            let since = now.checked_sub_months(Months::new(1)).unwrap_or(now);
            let recent: Vec<ProfileView> = views.into_iter().filter(|v| v.viewed_at >= since).collect();
            let skip = recent.len().saturating_sub(BASIC_VISIBLE_VIEWS);
            recent.into_iter().skip(skip).collect()
        }
        Some(MembershipType::Premium) => views,
    };

    membership_service::bump_usage(store, profile_id, UsageCounter::ViewersViews)?;
    Ok(visible)
}

/// Drop views recorded before `before`; returns how many were removed.
pub fn delete_old_views(store: &dyn Store, before: DateTime<Utc>) -> AppResult<usize> {
    let deleted = store.profile_views().delete_before(before)?;
    tracing::info!(deleted, before = %before, "old profile views deleted");
    Ok(deleted)
}
