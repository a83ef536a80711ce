use super::*;
use crate::test_support::{gateway, signed_in_session, spawn_api};
use axum::{
    extract::{Path, State},
    routing::{get, patch},
    Json, Router,
};
use chrono::TimeZone;
use serde_json::{json, Value};
use shared::domain::SubmitterSummary;
use std::sync::Arc;
use tokio::sync::Mutex;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).single().expect("valid time")
}

fn pitch(id: i64, status: Option<&str>, updated_at: Option<DateTime<Utc>>) -> Pitch {
    Pitch {
        id: PitchId(id),
        user: Some(SubmitterSummary::default()),
        review: Some(Review {
            review_status: status.map(str::to_string),
            reviewer_name: None,
            updated_at: updated_at.map(|at| at.to_rfc3339()),
        }),
    }
}

fn ids(pitches: &[Pitch]) -> Vec<i64> {
    pitches.iter().map(|pitch| pitch.id.0).collect()
}

fn sample() -> Vec<Pitch> {
    let now = now();
    vec![
        pitch(1, Some("pending"), Some(now - Duration::days(2))),
        pitch(2, Some("approved"), Some(now - Duration::days(10))),
        pitch(3, Some("declined"), Some(now - Duration::days(40))),
        pitch(4, Some("Approved"), Some(now - Duration::days(400))),
        pitch(5, None, None),
    ]
}

#[test]
fn status_filter_keeps_only_matching_pitches() {
    let pitches = vec![
        pitch(1, Some("pending"), Some(now())),
        pitch(2, Some("approved"), Some(now())),
        pitch(3, Some("declined"), Some(now())),
    ];
    let approved = apply_filters_at(
        &pitches,
        RecencyWindow::All,
        StatusFilter::Only(ReviewStatus::Approved),
        now(),
    );
    assert_eq!(ids(&approved), vec![2]);
}

#[test]
fn recency_window_boundaries() {
    let ten_days_ago = vec![pitch(9, Some("pending"), Some(now() - Duration::days(10)))];

    let week = apply_filters_at(&ten_days_ago, RecencyWindow::LastWeek, StatusFilter::All, now());
    assert!(week.is_empty());

    let month = apply_filters_at(&ten_days_ago, RecencyWindow::Month, StatusFilter::All, now());
    assert_eq!(ids(&month), vec![9]);
}

#[test]
fn windows_are_nested_and_preserve_order() {
    let pitches = sample();
    let all = apply_filters_at(&pitches, RecencyWindow::All, StatusFilter::All, now());
    let year = apply_filters_at(&pitches, RecencyWindow::Year, StatusFilter::All, now());
    let month = apply_filters_at(&pitches, RecencyWindow::Month, StatusFilter::All, now());
    let week = apply_filters_at(&pitches, RecencyWindow::LastWeek, StatusFilter::All, now());

    assert_eq!(ids(&all), vec![1, 2, 3, 4, 5]);
    assert_eq!(ids(&year), vec![1, 2, 3]);
    assert_eq!(ids(&month), vec![1, 2]);
    assert_eq!(ids(&week), vec![1]);
}

#[test]
fn filters_commute_and_are_idempotent() {
    let pitches = sample();
    let window = RecencyWindow::Year;
    let status = StatusFilter::Only(ReviewStatus::Approved);

    let both = apply_filters_at(&pitches, window, status, now());
    let status_first = apply_filters_at(
        &apply_filters_at(&pitches, RecencyWindow::All, status, now()),
        window,
        StatusFilter::All,
        now(),
    );
    assert_eq!(both, status_first);
    assert_eq!(apply_filters_at(&both, window, status, now()), both);
    assert_eq!(pitches, sample());
}

#[test]
fn status_filter_ignores_case() {
    let approved = apply_filters_at(
        &sample(),
        RecencyWindow::All,
        StatusFilter::Only(ReviewStatus::Approved),
        now(),
    );
    assert_eq!(ids(&approved), vec![2, 4]);
}

#[test]
fn malformed_review_only_passes_all() {
    let pitches = vec![Pitch {
        id: PitchId(11),
        user: None,
        review: None,
    }];
    assert_eq!(
        apply_filters_at(&pitches, RecencyWindow::All, StatusFilter::All, now()).len(),
        1
    );
    assert!(apply_filters_at(&pitches, RecencyWindow::Month, StatusFilter::All, now()).is_empty());
    assert!(apply_filters_at(
        &pitches,
        RecencyWindow::All,
        StatusFilter::Only(ReviewStatus::Pending),
        now()
    )
    .is_empty());
}

#[test]
fn parses_filter_values() {
    assert_eq!("last-week".parse::<RecencyWindow>().ok(), Some(RecencyWindow::LastWeek));
    assert_eq!("YEAR".parse::<RecencyWindow>().ok(), Some(RecencyWindow::Year));
    assert!("fortnight".parse::<RecencyWindow>().is_err());
    assert_eq!("all".parse::<StatusFilter>().ok(), Some(StatusFilter::All));
    assert_eq!(
        "Declined".parse::<StatusFilter>().ok(),
        Some(StatusFilter::Only(ReviewStatus::Declined))
    );
}

#[test]
fn sections_advance_linearly() {
    let mut walked = vec![PitchSection::Personal];
    while let Some(next) = walked.last().and_then(|section| section.next()) {
        walked.push(next);
    }
    assert_eq!(walked, PitchSection::ORDER.to_vec());
    assert_eq!(PitchSection::Technical.next(), None);
}

#[test]
fn missing_section_renders_empty() {
    let detail = PitchDetail {
        review_status: Some("pending".to_string()),
        ..PitchDetail::default()
    };
    let view = SectionView::from_detail(PitchId(3), PitchSection::Technical, &detail);
    assert_eq!(view.content, SectionContent::Technical(TechnicalAgreement::default()));
    assert_eq!(view.status_label(), "pending");

    let unknown = SectionView::from_detail(PitchId(3), PitchSection::Personal, &PitchDetail::default());
    assert_eq!(unknown.status_label(), "Unknown");
}

#[derive(Clone, Default)]
struct MockPitches {
    rows: Arc<Mutex<Vec<Value>>>,
    reviews: Arc<Mutex<Vec<Value>>>,
}

fn pitch_api(mock: MockPitches) -> Router {
    Router::new()
        .route(
            "/admin/get-Pitches",
            get(|State(mock): State<MockPitches>| async move {
                Json(Value::Array(mock.rows.lock().await.clone()))
            }),
        )
        .route(
            "/admin/review-pitch",
            patch(
                |State(mock): State<MockPitches>, Json(body): Json<Value>| async move {
                    mock.reviews.lock().await.push(body.clone());
                    let mut rows = mock.rows.lock().await;
                    for row in rows.iter_mut().filter(|row| row["id"] == body["pitchId"]) {
                        row["review"]["review_status"] = body["reviewStatus"].clone();
                        row["review"]["reviewer_name"] = json!("Grace Hopper");
                        row["review"]["updated_at"] = json!("2024-06-15T12:00:00.000Z");
                    }
                    Json(json!({ "message": "Pitch reviewed" }))
                },
            ),
        )
        .route(
            "/admin/get-pitch/:id",
            get(|Path(id): Path<i64>| async move {
                Json(json!({
                    "pitch": {
                        "id": id,
                        "review_status": "approved",
                        "competition_questions": { "business_name": "Solar Kiosks" }
                    }
                }))
            }),
        )
        .with_state(mock)
}

fn seeded_mock() -> MockPitches {
    let mock = MockPitches::default();
    let rows = vec![
        json!({ "id": 41, "review": { "review_status": "pending", "reviewer_name": null, "updated_at": "2024-06-01T09:00:00Z" } }),
        json!({ "id": 42, "review": { "review_status": "approved", "reviewer_name": "Ada", "updated_at": "2024-06-01T09:00:00Z" } }),
    ];
    *mock.rows.try_lock().expect("fresh mock") = rows;
    mock
}

#[tokio::test]
async fn review_transition_refetches_authoritative_list() {
    let mock = seeded_mock();
    let base = spawn_api(pitch_api(mock.clone())).await;
    let session = signed_in_session().await;
    let engine = PitchReviewEngine::new(gateway(&base, &session));

    let before = engine.list_pitches().await.expect("list");
    let target = before
        .iter()
        .find(|pitch| pitch.id == PitchId(42))
        .expect("pitch 42")
        .clone();

    let after = engine
        .review(&target, ReviewStatus::Declined)
        .await
        .expect("review");
    let updated = after
        .iter()
        .find(|pitch| pitch.id == PitchId(42))
        .and_then(|pitch| pitch.review.clone())
        .expect("review of 42");
    assert_eq!(updated.status(), Some(ReviewStatus::Declined));
    assert_eq!(updated.reviewer_name.as_deref(), Some("Grace Hopper"));

    let sent = mock.reviews.lock().await.clone();
    assert_eq!(sent, vec![json!({ "pitchId": 42, "reviewStatus": "declined" })]);
}

#[tokio::test]
async fn disallowed_transition_is_rejected_before_sending() {
    let mock = seeded_mock();
    let base = spawn_api(pitch_api(mock.clone())).await;
    let session = signed_in_session().await;
    let engine = PitchReviewEngine::new(gateway(&base, &session));

    let pending = pitch(41, Some("approved"), None);
    let err = engine
        .review(&pending, ReviewStatus::Pending)
        .await
        .expect_err("approved cannot return to pending");
    assert!(matches!(err, ClientError::InvalidTransition(_)));
    assert!(mock.reviews.lock().await.is_empty());
}

#[tokio::test]
async fn section_carries_review_status() {
    let base = spawn_api(pitch_api(MockPitches::default())).await;
    let session = signed_in_session().await;
    let engine = PitchReviewEngine::new(gateway(&base, &session));

    let view = engine
        .section(PitchId(5), PitchSection::Competition)
        .await
        .expect("section");
    assert_eq!(view.pitch_id, PitchId(5));
    assert_eq!(view.status_label(), "approved");
    match view.content {
        SectionContent::Competition(questions) => {
            assert_eq!(questions.business_name.as_deref(), Some("Solar Kiosks"))
        }
        other => panic!("unexpected section {other:?}"),
    }
}
