use chrono::Utc;
use uuid::Uuid;

use milan_shared::types::pagination::{Paginated, PaginationParams};
use milan_shared::{AppError, AppResult, ErrorCode};

use super::{profile_service, staff_service, validate_input};
use crate::models::{report_status, Report, ReportInput};
use crate::repository::Store;

pub fn get(store: &dyn Store, id: Uuid) -> AppResult<Report> {
    store
        .reports()
        .get_by_id(id)?
        .ok_or_else(|| AppError::new(ErrorCode::ReportNotFound, "report not found"))
}

/// File a report against another profile. One pending report per pair.
pub fn create(store: &dyn Store, input: ReportInput) -> AppResult<Report> {
    validate_input(&input)?;
    if input.reporter_profile_id == input.reported_profile_id {
        return Err(AppError::new(ErrorCode::CannotReportSelf, "a profile cannot report itself"));
    }
    profile_service::get(store, input.reporter_profile_id)?;
    profile_service::get(store, input.reported_profile_id)?;

    if store
        .reports()
        .find_pending(input.reporter_profile_id, input.reported_profile_id)?
        .is_some()
    {
        return Err(AppError::new(
            ErrorCode::DuplicateReport,
            "a report against this profile is already pending",
        ));
    }

    let report = store.reports().add(&Report {
        id: Uuid::now_v7(),
        reporter_profile_id: input.reporter_profile_id,
        reported_profile_id: input.reported_profile_id,
        reason: input.reason,
        details: input.details,
        status: report_status::PENDING.to_string(),
        reviewed_by: None,
        reviewed_at: None,
        created_at: Utc::now(),
    })?;

    tracing::info!(
        report_id = %report.id,
        reported_profile_id = %report.reported_profile_id,
        "report created"
    );
    Ok(report)
}

/// Reports filtered by status when one is given.
pub fn list(store: &dyn Store, status: Option<&str>, params: &PaginationParams) -> AppResult<Paginated<Report>> {
    let reports = store
        .reports()
        .get_all()?
        .into_iter()
        .filter(|r| status.map_or(true, |s| r.status == s))
        .collect();
    Ok(params.paginate(reports))
}

/// Close a pending report as reviewed, or dismissed when `dismiss` is set.
pub fn review(store: &dyn Store, id: Uuid, staff_user_id: Uuid, dismiss: bool) -> AppResult<Report> {
    let mut report = get(store, id)?;
    let staff = staff_service::require_staff(store, staff_user_id)?;

    if !report.is_pending() {
        return Err(AppError::new(
            ErrorCode::ReportAlreadyReviewed,
            "report has already been reviewed",
        ));
    }

    report.status = if dismiss {
        report_status::DISMISSED
    } else {
        report_status::REVIEWED
    }
    .to_string();
    report.reviewed_by = Some(staff.id);
    report.reviewed_at = Some(Utc::now());

    let report = store
        .reports()
        .update(&report)?
        .ok_or_else(|| AppError::new(ErrorCode::ReportNotFound, "report not found"))?;

    tracing::info!(report_id = %id, staff_id = %staff.id, status = %report.status, "report reviewed");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use milan_shared::ErrorKind;

    use crate::models::{staff_roles, Staff};
    use crate::test_support::{seed_profile, store_with_profile, user_fixture};

    fn input(reporter: Uuid, reported: Uuid) -> ReportInput {
        ReportInput {
            reporter_profile_id: reporter,
            reported_profile_id: reported,
            reason: "fake photos".into(),
            details: None,
        }
    }

    fn moderator(store: &dyn Store) -> Staff {
        let user = store.users().add(&user_fixture("mod@milan.test")).unwrap();
        store
            .staff()
            .add(&Staff {
                id: Uuid::now_v7(),
                user_id: user.id,
                full_name: "Mod".into(),
                email: "mod@milan.test".into(),
                role: staff_roles::MODERATOR.into(),
                created_at: Utc::now(),
            })
            .unwrap()
    }

    #[test]
    fn pending_report_blocks_a_second_one() {
        let (store, user, a) = store_with_profile();
        let b = seed_profile(&store, user.id);

        let report = create(&store, input(a.id, b.id)).unwrap();
        assert!(report.is_pending());

        let err = create(&store, input(a.id, b.id)).unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::DuplicateReport));
    }

    #[test]
    fn reporting_yourself_is_refused() {
        let (store, _, a) = store_with_profile();
        let err = create(&store, input(a.id, a.id)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SelfReference);
    }

    #[test]
    fn review_by_staff_closes_the_report_once() {
        let (store, user, a) = store_with_profile();
        let b = seed_profile(&store, user.id);
        let staff = moderator(&store);
        let report = create(&store, input(a.id, b.id)).unwrap();

        let reviewed = review(&store, report.id, staff.user_id, true).unwrap();
        assert_eq!(reviewed.status, report_status::DISMISSED);
        assert_eq!(reviewed.reviewed_by, Some(staff.id));

        let err = review(&store, report.id, staff.user_id, false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);

        // A closed report no longer blocks a new one.
        assert!(create(&store, input(a.id, b.id)).is_ok());
    }

    #[test]
    fn review_requires_a_staff_record() {
        let (store, user, a) = store_with_profile();
        let b = seed_profile(&store, user.id);
        let report = create(&store, input(a.id, b.id)).unwrap();

        let err = review(&store, report.id, user.id, false).unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::NotStaffMember));

        let err = review(&store, Uuid::now_v7(), user.id, false).unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::ReportNotFound));
    }

    #[test]
    fn list_filters_by_status() {
        let (store, user, a) = store_with_profile();
        let b = seed_profile(&store, user.id);
        let c = seed_profile(&store, user.id);
        let staff = moderator(&store);

        let first = create(&store, input(a.id, b.id)).unwrap();
        create(&store, input(a.id, c.id)).unwrap();
        review(&store, first.id, staff.user_id, false).unwrap();

        let params = PaginationParams::default();
        assert_eq!(list(&store, None, &params).unwrap().total, 2);
        let pending = list(&store, Some(report_status::PENDING), &params).unwrap();
        assert_eq!(pending.total, 1);
        assert_eq!(pending.items[0].reported_profile_id, c.id);
    }
}
