use std::time::Duration;

use rodio::source::{SineWave, Source, Zero};
use rodio::Sink;

use crate::timer::ToneKind;

const TONE_AMPLITUDE: f32 = 0.25;
const SILENCE_SAMPLE_RATE: u32 = 48_000;

/// One beep (`Some(hz)`) or gap (`None`) in a tone pattern.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub frequency: Option<f32>,
    pub duration: Duration,
}

const fn beep(hz: f32, ms: u64) -> Step {
    Step {
        frequency: Some(hz),
        duration: Duration::from_millis(ms),
    }
}

const fn gap(ms: u64) -> Step {
    Step {
        frequency: None,
        duration: Duration::from_millis(ms),
    }
}

pub fn pattern(kind: ToneKind) -> &'static [Step] {
    const WORK_COMPLETE: [Step; 3] = [beep(1000.0, 200), gap(100), beep(1000.0, 200)];
    const BREAK_FINISHED: [Step; 5] = [
        beep(800.0, 150),
        gap(50),
        beep(1000.0, 150),
        gap(50),
        beep(1200.0, 150),
    ];
    const BREAK_OVERTIME: [Step; 5] = [
        beep(1200.0, 100),
        gap(100),
        beep(900.0, 100),
        gap(100),
        beep(1200.0, 100),
    ];
    const WRONG_APP: [Step; 1] = [beep(600.0, 150)];

    match kind {
        ToneKind::WorkComplete => &WORK_COMPLETE,
        ToneKind::BreakFinished => &BREAK_FINISHED,
        ToneKind::BreakOvertime => &BREAK_OVERTIME,
        ToneKind::WrongApp => &WRONG_APP,
    }
}

/// Two alternating pitches, used as the distraction track when no audio files exist.
pub fn siren() -> [Step; 4] {
    [beep(880.0, 350), gap(50), beep(660.0, 350), gap(50)]
}

pub fn append_steps(sink: &Sink, steps: &[Step]) {
    for step in steps {
        match step.frequency {
            Some(hz) => sink.append(
                SineWave::new(hz)
                    .take_duration(step.duration)
                    .amplify(TONE_AMPLITUDE),
            ),
            None => sink.append(Zero::<f32>::new(1, SILENCE_SAMPLE_RATE).take_duration(step.duration)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn total(steps: &[Step]) -> Duration {
        steps.iter().map(|s| s.duration).sum()
    }

    #[test]
    fn test_patterns_match_expected_shapes() {
        assert_eq!(pattern(ToneKind::WorkComplete).len(), 3);
        assert_eq!(total(pattern(ToneKind::WorkComplete)), Duration::from_millis(500));
        assert_eq!(total(pattern(ToneKind::BreakOvertime)), Duration::from_millis(500));
        assert_eq!(pattern(ToneKind::WrongApp), &[beep(600.0, 150)]);
    }

    #[test]
    fn test_break_finished_ascends() {
        let pitches: Vec<f32> = pattern(ToneKind::BreakFinished)
            .iter()
            .filter_map(|s| s.frequency)
            .collect();
        assert_eq!(pitches, vec![800.0, 1000.0, 1200.0]);
    }
}
