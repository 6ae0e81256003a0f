use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use crate::events::publisher;
use crate::services::{membership_service, profile_view_service};
use crate::AppState;

/// Periodically downgrade expired memberships and close ended trials.
pub fn spawn_membership_sweep(state: Arc<AppState>) {
    let period = Duration::from_secs(state.config.membership_sweep_secs.max(1));

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);

        loop {
            interval.tick().await;

            tracing::debug!("running membership sweep");
            match membership_service::validate_all(state.store.as_ref()) {
                Ok(summary) => {
                    tracing::info!(
                        checked = summary.checked,
                        downgraded = summary.downgraded,
                        trials_ended = summary.trials_ended,
                        "membership sweep completed"
                    );
                    for validated in &summary.changed {
                        publisher::publish_membership_changed(&state.events, validated).await;
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "membership sweep failed");
                }
            }
        }
    });
}

/// Periodically purge profile views older than the retention window.
pub fn spawn_view_cleanup(state: Arc<AppState>) {
    let period = Duration::from_secs(state.config.view_cleanup_secs.max(1));
    let retention = chrono::Duration::days(state.config.view_retention_days);

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);

        loop {
            interval.tick().await;

            let before = Utc::now() - retention;
            if let Err(e) = profile_view_service::delete_old_views(state.store.as_ref(), before) {
                tracing::error!(error = %e, "profile view cleanup failed");
            }
        }
    });
}
