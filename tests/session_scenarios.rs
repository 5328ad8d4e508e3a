use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use cotton_pomodoro_lib::garden::{SlotPicker, GARDEN_SIZE};
use cotton_pomodoro_lib::sensing::ActiveWindow;
use cotton_pomodoro_lib::settings::{parse_settings, Settings, SettingsCandidate};
use cotton_pomodoro_lib::timer::{Effect, Phase, PhaseKind, SessionEngine, ToneKind};

struct Picks(VecDeque<usize>);

impl SlotPicker for Picks {
    fn pick(&mut self, upper: usize) -> usize {
        self.0.pop_front().unwrap_or(0) % upper
    }
}

fn engine_with(settings: Settings) -> SessionEngine {
    let mut engine = SessionEngine::new(Arc::new(settings), Box::new(Picks(VecDeque::new())));
    engine.startup();
    engine
}

fn default_engine() -> SessionEngine {
    engine_with(Settings::default())
}

fn houdini() -> ActiveWindow {
    ActiveWindow {
        title: "untitled.hip - Houdini FX".into(),
        process_name: "houdinifx".into(),
    }
}

fn chat() -> ActiveWindow {
    ActiveWindow {
        title: "General - Discord".into(),
        process_name: "Discord".into(),
    }
}

fn notices(effects: &[Effect]) -> usize {
    effects
        .iter()
        .filter(|effect| matches!(effect, Effect::Notify { .. }))
        .count()
}

#[test]
fn test_full_session_completes_once_into_break() {
    let mut engine = default_engine();
    engine.toggle_start();
    let t0 = Instant::now();

    let mut completions = 0;
    for second in 0..1500 {
        let effects = engine.tick(t0 + Duration::from_secs(second), Some(&houdini()));
        completions += effects
            .iter()
            .filter(|effect| {
                **effect
                    == Effect::PhaseChanged {
                        phase: PhaseKind::Completed,
                    }
            })
            .count();

        if let Phase::Working { remaining_secs, .. } = engine.phase() {
            assert!((0..=1500).contains(remaining_secs));
        }
    }

    assert_eq!(completions, 1);
    assert_eq!(
        engine.phase(),
        &Phase::Break {
            elapsed_secs: 0,
            overtime_notified: false
        }
    );
    let snapshot = engine.snapshot();
    assert_eq!(snapshot.break_total_secs, 300);
    assert_eq!(snapshot.session_count, 1);
    assert_eq!(engine.garden().flower_count(), 1);
}

#[test]
fn test_twelve_seconds_off_task_then_back() {
    let mut engine = default_engine();
    engine.toggle_start();
    let t0 = Instant::now();

    let mut fired = 0;
    for second in 0..12 {
        fired += notices(&engine.tick(t0 + Duration::from_secs(second), Some(&chat())));
    }
    let effects = engine.tick(t0 + Duration::from_secs(12), Some(&houdini()));

    assert_eq!(fired, 1);
    assert_eq!(notices(&effects), 0);
    assert!(effects.contains(&Effect::StopDistraction));
    assert!(!engine.phase().is_off_task());
    assert_eq!(engine.snapshot().remaining_secs, 1499);
}

#[test]
fn test_short_excursion_never_notifies() {
    let mut engine = default_engine();
    engine.toggle_start();
    let t0 = Instant::now();

    let mut all = Vec::new();
    for second in 0..4 {
        all.extend(engine.tick(t0 + Duration::from_secs(second), Some(&chat())));
    }
    all.extend(engine.tick(t0 + Duration::from_secs(4), Some(&houdini())));

    assert_eq!(notices(&all), 0);
    assert!(!all.contains(&Effect::PlayTone {
        tone: ToneKind::WrongApp
    }));
}

#[test]
fn test_stop_mid_session_then_start_skips_to_break() {
    let mut engine = default_engine();
    engine.toggle_start();
    let t0 = Instant::now();
    for second in 0..300 {
        engine.tick(t0 + Duration::from_secs(second), Some(&houdini()));
    }
    assert_eq!(engine.snapshot().remaining_secs, 1200);

    engine.toggle_start();
    assert_eq!(engine.phase().kind(), PhaseKind::Stopped);

    engine.toggle_start();
    assert_eq!(engine.snapshot().phase, PhaseKind::Break);
    assert_eq!(engine.snapshot().break_elapsed_secs, 0);
}

#[test]
fn test_break_overtime_notifies_exactly_once() {
    let mut engine = default_engine();
    for _ in 0..3 {
        engine.toggle_start();
    }
    let now = Instant::now();
    for _ in 0..300 {
        assert_eq!(notices(&engine.tick(now, None)), 0);
    }

    let first_over = engine.tick(now, None);
    assert_eq!(notices(&first_over), 1);
    assert!(first_over.contains(&Effect::notify(
        "Break Time's Up!",
        "You're on overtime 😄"
    )));

    let second_over = engine.tick(now, None);
    assert_eq!(notices(&second_over), 0);
}

#[test]
fn test_settings_file_missing_break_keeps_other_fields() {
    let settings = parse_settings(r#"{"right_apps": ["nuke"], "work_minutes": 15}"#);
    assert_eq!(settings.break_minutes, 5);
    assert_eq!(settings.work_minutes, 15);
    assert_eq!(settings.right_apps, vec!["nuke".to_string()]);

    let mut engine = engine_with(settings);
    engine.toggle_start();
    assert_eq!(engine.snapshot().remaining_secs, 900);
}

#[test]
fn test_reapplying_same_settings_is_idempotent() {
    let mut engine = default_engine();
    engine.toggle_start();

    let candidate = SettingsCandidate::from_apps_text("houdini", "20", "4");
    let first = engine.apply_settings(Arc::new(Settings::from_candidate(&candidate)));
    let after_first = engine.snapshot();
    let second = engine.apply_settings(Arc::new(Settings::from_candidate(&candidate)));

    assert_eq!(first.len(), 1);
    assert!(second.is_empty());
    assert_eq!(engine.snapshot(), after_first);
    assert_eq!(after_first.work_total_secs, 1200);
}

#[test]
fn test_garden_saturates_then_churns() {
    let mut engine = SessionEngine::new(
        Arc::new(Settings {
            right_apps: vec!["houdini".into()],
            work_minutes: 1,
            break_minutes: 1,
        }),
        Box::new(Picks((0..40).collect())),
    );
    engine.startup();
    let t0 = Instant::now();

    let mut previous = 0;
    for session in 0..8u64 {
        engine.toggle_start();
        for second in 0..60 {
            engine.tick(t0 + Duration::from_secs(session * 100 + second), Some(&houdini()));
        }
        assert_eq!(engine.phase().kind(), PhaseKind::Break);
        engine.toggle_start();

        let flowers = engine.garden().flower_count();
        assert!(flowers >= previous);
        assert_eq!(engine.garden().slots().len(), GARDEN_SIZE);
        previous = flowers;
    }

    assert_eq!(previous, GARDEN_SIZE);
    assert_eq!(engine.garden().session_count(), 8);
}
