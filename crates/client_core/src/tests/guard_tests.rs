use super::*;
use crate::test_support::admin;

const ALL_VIEWS: [View; 16] = [
    View::Login,
    View::AccessDenied,
    View::Privacy,
    View::DeleteAccount,
    View::Dashboard,
    View::Pitches,
    View::PitchSection {
        pitch_id: PitchId(42),
        section: PitchSection::Personal,
    },
    View::PitchSection {
        pitch_id: PitchId(42),
        section: PitchSection::Technical,
    },
    View::Businesses,
    View::Events,
    View::Personnel,
    View::Support,
    View::Notifications,
    View::ScheduledMeetings,
    View::Nominees {
        award_id: AwardId(3),
    },
    View::Sponsors,
];

#[test]
fn paths_round_trip() {
    for view in ALL_VIEWS {
        assert_eq!(View::from_path(&view.path()), Some(view), "{}", view.path());
    }
    assert_eq!(View::from_path("/awards"), Some(View::Awards));
}

#[test]
fn pitch_section_paths() {
    assert_eq!(
        View::from_path("/pitch/competition/7"),
        Some(View::PitchSection {
            pitch_id: PitchId(7),
            section: PitchSection::Competition
        })
    );
    assert_eq!(View::from_path("/pitch/personal/7"), None);
    assert_eq!(View::from_path("/pitch/abc"), None);
    assert_eq!(View::from_path("/pitches?filter=month"), Some(View::Pitches));
    assert_eq!(View::from_path("/nowhere"), None);
}

#[test]
fn next_pitch_step_walks_sections() {
    let personal = View::PitchSection {
        pitch_id: PitchId(1),
        section: PitchSection::Personal,
    };
    let professional = personal.next_pitch_step().expect("professional");
    assert_eq!(professional.path(), "/pitch/professional/1");

    let technical = View::PitchSection {
        pitch_id: PitchId(1),
        section: PitchSection::Technical,
    };
    assert_eq!(technical.next_pitch_step(), None);
    assert_eq!(View::Dashboard.next_pitch_step(), None);
}

#[test]
fn signed_out_session_is_redirected_from_protected_views() {
    let session = Session::default();
    for view in ALL_VIEWS {
        let expected = if view.is_protected() {
            GuardDecision::Redirect(View::Login)
        } else {
            GuardDecision::Render(view)
        };
        assert_eq!(decide(view, &session), expected, "{}", view.path());
    }
    assert!(View::AccessDenied.is_protected());
    assert!(!View::DeleteAccount.is_protected());
}

#[tokio::test]
async fn guard_follows_session_changes() {
    let store = SessionStore::in_memory();
    let guard = RouteGuard::new(store.clone());
    assert_eq!(guard.check(View::Pitches), GuardDecision::Redirect(View::Login));

    store.sign_in("tok", admin()).await;
    assert_eq!(guard.check(View::Pitches), GuardDecision::Render(View::Pitches));
    assert_eq!(
        guard.check_path("/awards/nominees/9"),
        Some(GuardDecision::Render(View::Nominees {
            award_id: AwardId(9)
        }))
    );

    store.sign_out().await;
    assert_eq!(
        guard.check_path("/scheduledMeetings"),
        Some(GuardDecision::Redirect(View::Login))
    );
    assert_eq!(guard.check_path("/privacy"), Some(GuardDecision::Render(View::Privacy)));
    assert_eq!(guard.check_path("/missing"), None);
}
