use super::*;
use crate::joints::Joint;

const THRESHOLD: f32 = 40.0;

fn config() -> GameConfig {
    GameConfig {
        default_threshold_px: THRESHOLD,
        seed: 0xDEAD_BEEF,
        ..GameConfig::default()
    }
}

fn session() -> GameSession {
    GameSession::new(config()).expect("default config is valid")
}

fn hand(pinch: f32, tip: Point2D, knuckle: Point2D) -> HandJoints {
    HandJoints::default()
        .with(Joint::IndexTip, tip)
        .with(Joint::ThumbTip, Point2D::new(tip.x, tip.y + pinch))
        .with(Joint::IndexMcp, knuckle)
}

fn frame(ms: u64, hands: Vec<HandJoints>) -> FrameInput {
    FrameInput {
        now: Duration::from_millis(ms),
        hands,
    }
}

fn count_released(events: &[GameEvent]) -> usize {
    events
        .iter()
        .filter(|event| matches!(event, GameEvent::Released { .. }))
        .count()
}

#[test]
fn draw_then_release_fires_exactly_once() {
    let mut session = session();
    let tip = Point2D::new(600.0, 240.0);
    let knuckle = Point2D::new(620.0, 240.0);

    let events = session.step(&frame(33, vec![hand(15.0, tip, knuckle)]));
    assert_eq!(events, vec![GameEvent::DrawStarted]);
    assert_eq!(session.projectile().state, GestureState::Drawing);
    assert_eq!(session.projectile().position, tip);

    let events = session.step(&frame(66, vec![hand(25.0, tip, knuckle)]));
    assert_eq!(count_released(&events), 1);
    assert_eq!(
        events[0],
        GameEvent::Released {
            direction: Point2D::new(-1.0, 0.0)
        }
    );
    assert_eq!(session.projectile().position, Point2D::new(550.0, 240.0));

    let events = session.step(&frame(99, vec![hand(25.0, tip, knuckle)]));
    assert_eq!(count_released(&events), 0);
    assert_eq!(session.projectile().state, GestureState::Released);
    assert_eq!(session.projectile().position, Point2D::new(500.0, 240.0));
    assert_eq!(session.stats().shots, 1);
}

#[test]
fn released_arrow_keeps_flying_without_a_hand() {
    let mut session = session();
    let tip = Point2D::new(600.0, 400.0);
    let knuckle = Point2D::new(620.0, 400.0);
    session.step(&frame(0, vec![hand(5.0, tip, knuckle)]));
    session.step(&frame(33, vec![hand(30.0, tip, knuckle)]));

    session.step(&frame(66, Vec::new()));
    assert_eq!(session.projectile().position, Point2D::new(500.0, 400.0));
}

#[test]
fn arrow_into_target_scores_and_resets() {
    let mut session = session();
    let target = *session.target();
    let center = target.position;
    let tip = Point2D::new(center.x + 50.0, center.y);
    let knuckle = Point2D::new(center.x + 60.0, center.y);

    session.step(&frame(100, vec![hand(5.0, tip, knuckle)]));
    let events = session.step(&frame(133, vec![hand(30.0, tip, knuckle)]));

    assert!(events.contains(&GameEvent::Hit {
        score: 1,
        at: center
    }));
    assert!(events
        .iter()
        .any(|event| matches!(event, GameEvent::TargetRelocated { .. })));
    assert_eq!(session.score(), 1);
    assert_eq!(session.stats().hits, 1);
    assert_eq!(session.projectile().state, GestureState::Idle);
    assert_eq!(session.projectile().position, session.config().arrow_rest);
    assert_eq!(
        session.target().next_move_deadline,
        Duration::from_millis(133) + session.config().target_move_interval()
    );
}

#[test]
fn arrow_leaving_frame_is_a_silent_miss() {
    let mut session = session();
    let tip = Point2D::new(600.0, 60.0);
    let knuckle = Point2D::new(600.0, 80.0);

    session.step(&frame(0, vec![hand(5.0, tip, knuckle)]));
    let events = session.step(&frame(33, vec![hand(30.0, tip, knuckle)]));
    assert_eq!(session.projectile().position, Point2D::new(600.0, 10.0));
    assert_eq!(count_released(&events), 1);

    let events = session.step(&frame(66, Vec::new()));
    assert_eq!(
        events,
        vec![GameEvent::Missed {
            exit: Point2D::new(600.0, -40.0)
        }]
    );
    assert_eq!(session.score(), 0);
    assert_eq!(session.stats().misses, 1);
    assert_eq!(session.projectile().state, GestureState::Idle);

    // A fresh draw cycle can start once the arrow is back at rest.
    let events = session.step(&frame(99, vec![hand(5.0, tip, knuckle)]));
    assert_eq!(events, vec![GameEvent::DrawStarted]);
}

#[test]
fn idle_target_relocates_after_interval() {
    let mut session = session();
    let before = *session.target();

    assert!(session.step(&frame(6_999, Vec::new())).is_empty());
    assert!(session.step(&frame(7_000, Vec::new())).is_empty());

    let events = session.step(&frame(7_001, Vec::new()));
    let relocated = *session.target();
    assert_eq!(
        events,
        vec![GameEvent::TargetRelocated {
            position: relocated.position
        }]
    );
    assert_eq!(relocated.next_move_deadline, Duration::from_millis(14_001));
    assert_ne!(before.next_move_deadline, relocated.next_move_deadline);
    assert_eq!(session.score(), 0);
    assert_eq!(session.stats().timed_relocations, 1);
}

#[test]
fn mode_change_resets_round_but_keeps_score_and_calibration() {
    let mut session = session();
    let center = session.target().position;
    let tip = Point2D::new(center.x + 50.0, center.y);
    let knuckle = Point2D::new(center.x + 60.0, center.y);
    session.step(&frame(0, vec![hand(5.0, tip, knuckle)]));
    session.step(&frame(33, vec![hand(30.0, tip, knuckle)]));
    assert_eq!(session.score(), 1);

    session.step(&frame(66, vec![hand(5.0, tip, knuckle)]));
    assert_eq!(session.projectile().state, GestureState::Drawing);
    let calibration = *session.calibration();
    let rng_before = session.rng_state();

    let (outcome, event) = session.apply(
        Command::SelectMode(GameMode::Traditional),
        Duration::from_millis(99),
    );
    assert_eq!(outcome, CommandOutcome::Continue);
    assert_eq!(event, Some(GameEvent::ModeChanged(GameMode::Traditional)));
    assert_eq!(session.projectile().state, GestureState::Idle);
    assert_eq!(session.projectile().position, session.config().arrow_rest);
    assert_ne!(session.rng_state(), rng_before);
    assert_eq!(
        session.target().next_move_deadline,
        Duration::from_millis(99) + session.config().target_move_interval()
    );
    assert_eq!(session.score(), 1);
    assert_eq!(*session.calibration(), calibration);
}

#[test]
fn calibration_sets_threshold_and_freezes_gameplay() {
    let mut session = session();
    assert!(!session.calibration().is_verified());
    assert_eq!(
        session.apply(Command::Calibrate, Duration::ZERO),
        (CommandOutcome::Continue, Some(GameEvent::CalibrationStarted))
    );
    assert_eq!(session.run_mode(), RunMode::Calibrating);
    assert_eq!(session.calibration_progress(), Some(0.0));

    let target = *session.target();
    let frames = session.config().calibration_frames as u64;
    let pinch = hand(80.0, Point2D::new(500.0, 200.0), Point2D::new(520.0, 200.0));
    let mut last_events = Vec::new();
    for index in 1..=frames {
        // Well past the target deadline: the scheduler must not run.
        last_events = session.step(&frame(10_000 + index, vec![pinch]));
        if index < frames {
            assert!(last_events.is_empty());
            assert_eq!(session.projectile().state, GestureState::Idle);
        }
    }

    let profile = *session.calibration();
    assert_eq!(last_events, vec![GameEvent::CalibrationCompleted(profile)]);
    assert!((profile.threshold - 80.0).abs() < 1e-3);
    assert_eq!(profile.sample_count as u64, frames);
    assert_eq!(session.run_mode(), RunMode::Playing);
    assert_eq!(*session.target(), target);
}

#[test]
fn calibration_without_hands_keeps_previous_threshold() {
    let mut session = session();
    session.begin_calibration();
    let frames = session.config().calibration_frames as u64;

    let mut last_events = Vec::new();
    for index in 0..frames {
        last_events = session.step(&frame(index * 33, Vec::new()));
    }

    assert_eq!(
        last_events,
        vec![GameEvent::CalibrationFailed(
            CalibrationError::InsufficientSamples {
                frames: frames as u32
            }
        )]
    );
    assert_eq!(session.calibration().threshold, THRESHOLD);
    assert!(!session.calibration().is_verified());
    assert_eq!(session.run_mode(), RunMode::Playing);
}

#[test]
fn quit_cancels_calibration_before_it_quits_the_game() {
    let mut session = session();
    session.begin_calibration();
    let open = hand(10.0, Point2D::new(1.0, 1.0), Point2D::new(2.0, 2.0));
    session.step(&frame(0, vec![open]));

    assert_eq!(
        session.apply(Command::Calibrate, Duration::ZERO),
        (CommandOutcome::Continue, None)
    );
    assert_eq!(
        session.apply(Command::Quit, Duration::ZERO),
        (CommandOutcome::Continue, Some(GameEvent::CalibrationCancelled))
    );
    assert_eq!(session.run_mode(), RunMode::Playing);
    assert_eq!(session.calibration().threshold, THRESHOLD);

    assert_eq!(
        session.apply(Command::Quit, Duration::ZERO),
        (CommandOutcome::Quit, None)
    );
}

#[test]
fn render_snapshot_tracks_phase() {
    let mut session = session();
    let snapshot = session.render_snapshot();
    assert_eq!(snapshot.arrow, None);
    assert_eq!(snapshot.score, 0);
    assert_eq!(snapshot.boundary.from, Point2D::new(370.0, 0.0));
    assert_eq!(snapshot.boundary.to, Point2D::new(370.0, 480.0));
    assert!(snapshot.target.is_some());
    assert!(snapshot.hands.is_empty());

    let tip = Point2D::new(600.0, 300.0);
    session.step(&frame(0, vec![hand(5.0, tip, Point2D::new(620.0, 300.0))]));
    let snapshot = session.render_snapshot();
    let arrow = snapshot.arrow.expect("arrow drawn while drawing");
    assert_eq!(arrow.base, tip);
    assert_eq!(arrow.tip, Point2D::new(525.0, 300.0));
    assert_eq!(snapshot.gesture, GestureState::Drawing);
    assert_eq!(snapshot.hands.len(), 1);
    assert_eq!(snapshot.hands[0].len(), crate::joints::HAND_BONES.len());

    session.begin_calibration();
    let snapshot = session.render_snapshot();
    assert_eq!(snapshot.calibration_progress, Some(0.0));
    assert_eq!(snapshot.target, None);
    assert_eq!(snapshot.arrow, None);
}

#[test]
fn invalid_config_is_rejected() {
    let result = GameSession::new(GameConfig {
        frame_height: 30,
        ..config()
    });
    assert!(matches!(result, Err(ConfigError::EmptySpawnArea { .. })));
}

#[test]
fn narrow_frame_cannot_place_targets_off_screen() {
    let result = GameSession::new(GameConfig {
        frame_width: 200,
        ..config()
    });
    assert!(matches!(
        result,
        Err(ConfigError::BoundaryOutsideFrame {
            frame_width: 200,
            ..
        })
    ));

    let mut session = GameSession::new(GameConfig {
        frame_width: 200,
        boundary_x_px: 160,
        boundary_margin_px: 40,
        ..config()
    })
    .expect("spawn area fits the frame");
    for step in 0..200u64 {
        session.change_mode(GameMode::Traditional, Duration::from_millis(step));
        let target = *session.target();
        assert!(target.position.x + target.radius <= 200.0, "{target:?}");
        assert!(target.position.x - target.radius >= 0.0, "{target:?}");
    }
}

#[test]
fn mode_change_mid_flight_counts_a_miss() {
    let mut session = session();
    let tip = Point2D::new(600.0, 400.0);
    let knuckle = Point2D::new(620.0, 400.0);
    session.step(&frame(0, vec![hand(5.0, tip, knuckle)]));
    session.step(&frame(33, vec![hand(30.0, tip, knuckle)]));
    assert!(session.projectile().is_released());

    session.change_mode(GameMode::Traditional, Duration::from_millis(66));
    let stats = session.stats();
    assert_eq!(stats.shots, 1);
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.shots, stats.hits + stats.misses);

    // An arrow still on the string was never shot.
    session.step(&frame(99, vec![hand(5.0, tip, knuckle)]));
    session.change_mode(GameMode::Traditional, Duration::from_millis(132));
    assert_eq!(session.stats().misses, 1);
}
