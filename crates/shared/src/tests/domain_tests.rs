use super::*;
use serde_json::json;

#[test]
fn review_status_parses_case_insensitively() {
    assert_eq!("Approved".parse::<ReviewStatus>(), Ok(ReviewStatus::Approved));
    assert_eq!(" PENDING ".parse::<ReviewStatus>(), Ok(ReviewStatus::Pending));
    assert!("closed".parse::<ReviewStatus>().is_err());
}

#[test]
fn review_transitions_follow_policy() {
    use ReviewStatus::*;

    assert_eq!(Pending.transition(Approved), Ok(Approved));
    assert_eq!(Declined.transition(Approved), Ok(Approved));
    assert_eq!(Pending.transition(Declined), Ok(Declined));
    assert_eq!(Approved.transition(Declined), Ok(Declined));

    assert!(Approved.transition(Approved).is_err());
    assert!(Declined.transition(Declined).is_err());
    assert!(Approved.transition(Pending).is_err());
    assert!(Declined.transition(Pending).is_err());

    let err = Approved.transition(Pending).expect_err("no way back to pending");
    assert_eq!(err.to_string(), "review status cannot move from approved to pending");
}

#[test]
fn pitch_with_malformed_review_still_decodes() {
    let pitches: Vec<Pitch> = serde_json::from_value(json!([
        { "id": 1, "review": "garbage" },
        { "id": 2 },
        { "id": 3, "review": { "review_status": 7, "updated_at": null } },
    ]))
    .expect("pitches");

    assert_eq!(pitches.len(), 3);
    assert!(pitches[0].review.is_none());
    assert!(pitches[1].review.is_none());
    let review = pitches[2].review.as_ref().expect("review object");
    assert_eq!(review.status(), None);
    assert_eq!(review.status_label(), "Unknown");
    assert_eq!(review.updated_at(), None);
}

#[test]
fn review_timestamp_accepts_common_formats() {
    let rfc = Review {
        updated_at: Some("2024-05-01T10:00:00.000Z".to_string()),
        ..Review::default()
    };
    assert!(rfc.updated_at().is_some());

    let naive = Review {
        updated_at: Some("2024-05-01 10:00:00".to_string()),
        ..Review::default()
    };
    assert_eq!(rfc.updated_at(), naive.updated_at());

    let broken = Review {
        updated_at: Some("yesterday".to_string()),
        ..Review::default()
    };
    assert_eq!(broken.updated_at(), None);
}

#[test]
fn nominee_subject_is_exclusive() {
    let nominees: Vec<Nominee> = serde_json::from_value(json!([
        { "id": 1, "votes_count": 4, "nominee_type": "user",
          "user_nominee": { "id": 9, "full_name": "Ada" } },
        { "id": 2, "votes_count": 0, "business_nominee": { "full_name": "Acme" } },
        { "id": 3, "votes_count": 2, "pitch_nominee": { "id": 42 } },
    ]))
    .expect("nominees");

    assert!(matches!(&nominees[0].subject, NomineeSubject::User(user) if user.full_name.as_deref() == Some("Ada")));
    assert!(matches!(&nominees[1].subject, NomineeSubject::Business(_)));
    assert_eq!(nominees[2].subject, NomineeSubject::Pitch(PitchId(42)));

    let ambiguous = serde_json::from_value::<Nominee>(json!({
        "id": 4,
        "user_nominee": { "full_name": "Ada" },
        "pitch_nominee": { "id": 1 },
    }));
    assert!(ambiguous.is_err());

    let empty = serde_json::from_value::<Nominee>(json!({ "id": 5 }));
    assert!(empty.is_err());
}

#[test]
fn nominee_serializes_back_to_wire_shape() {
    let nominee = Nominee {
        id: NomineeId(3),
        nominee_type: Some("pitch".to_string()),
        votes_count: 2,
        subject: NomineeSubject::Pitch(PitchId(42)),
    };
    let value = serde_json::to_value(&nominee).expect("json");
    assert_eq!(value["pitch_nominee"]["id"], json!(42));
    assert!(value.get("user_nominee").is_none());
}

#[test]
fn award_status_uses_kebab_case() {
    let award: Award = serde_json::from_value(json!({
        "id": 1, "title": "Best pitch", "status": "voting-open"
    }))
    .expect("award");
    assert_eq!(award.status, Some(AwardStatus::VotingOpen));
    assert_eq!("Nominations-Open".parse::<AwardStatus>(), Ok(AwardStatus::NominationsOpen));
}

#[test]
fn metrics_default_missing_counts_to_zero() {
    let metrics: Metrics = serde_json::from_value(json!({ "totalPitches": 12, "approvedPitches": 3 }))
        .expect("metrics");
    assert_eq!(metrics.total_pitches, 12);
    assert_eq!(metrics.pending_reviews, 0);
    assert_eq!(
        metrics.review_breakdown(),
        [("Approved", 3), ("Pending", 0), ("Declined", 0)]
    );
}

#[test]
fn identity_role_tolerates_unknown_values() {
    let identity: Identity = serde_json::from_value(json!({
        "id": 7, "full_name": "Grace", "email": "g@example.com", "role": "superuser"
    }))
    .expect("identity");
    assert_eq!(identity.role, Role::Other);
    assert!(!identity.is_admin());
}
