use archery_core::joints::LANDMARK_COUNT;
use archery_core::{replay, Command, GameConfig, Joint, RecordedFrame, Recording};

const FRAME_MS: u64 = 33;

fn hand(thumb_gap: f32) -> Vec<[f32; 2]> {
    let mut landmarks = vec![[0.9, 0.5]; LANDMARK_COUNT];
    landmarks[Joint::IndexMcp.index()] = [0.95, 0.5];
    landmarks[Joint::ThumbTip.index()] = [0.9 + thumb_gap, 0.5];
    landmarks
}

fn scripted_recording(shots: usize) -> Recording {
    let mut frames = vec![RecordedFrame {
        elapsed_ms: 0,
        hands: Vec::new(),
        command: Some(Command::Calibrate),
    }];
    let mut push = |hands: Vec<Vec<[f32; 2]>>| {
        let elapsed_ms = frames.len() as u64 * FRAME_MS;
        frames.push(RecordedFrame {
            elapsed_ms,
            hands,
            command: None,
        });
    };

    for _ in 0..50 {
        push(vec![hand(0.1)]);
    }
    for _ in 0..shots {
        push(vec![hand(0.02)]);
        push(vec![hand(0.02)]);
        for _ in 0..20 {
            push(vec![hand(0.1)]);
        }
    }

    Recording {
        frame_width: 640,
        frame_height: 480,
        mirrored: true,
        frames,
    }
}

#[test]
fn same_recording_replays_identically() {
    let recording = scripted_recording(4);
    let a = replay(&recording, GameConfig::default()).expect("replay a");
    let b = replay(&recording, GameConfig::default()).expect("replay b");
    assert_eq!(a, b);
}

#[test]
fn scripted_shots_are_all_accounted_for() {
    let recording = scripted_recording(3);
    let outcome = replay(&recording, GameConfig::default()).expect("replay");

    assert!(outcome.calibration.is_verified());
    assert_eq!(outcome.calibration.sample_count, 50);
    assert!((outcome.calibration.threshold - 64.0).abs() < 0.01);

    assert_eq!(outcome.stats.shots, 3);
    assert_eq!(outcome.stats.hits + outcome.stats.misses, 3);
    assert_eq!(outcome.final_score, outcome.stats.hits);
    assert_eq!(outcome.frame_count, recording.frames.len() as u64);
    assert_eq!(outcome.quit_at_frame, None);
}

#[test]
fn seed_changes_target_sequence() {
    let recording = scripted_recording(1);
    let a = replay(&recording, GameConfig::default()).expect("replay a");
    let b = replay(
        &recording,
        GameConfig {
            seed: 0x0BAD_F00D,
            ..GameConfig::default()
        },
    )
    .expect("replay b");
    assert_ne!(a.final_rng_state, b.final_rng_state);
}

#[test]
fn recording_survives_json_round_trip() {
    let recording = scripted_recording(1);
    let json = serde_json::to_string(&recording).expect("serialize");
    let parsed: Recording = serde_json::from_str(&json).expect("parse");
    assert_eq!(
        replay(&parsed, GameConfig::default()).expect("parsed"),
        replay(&recording, GameConfig::default()).expect("original")
    );
}
