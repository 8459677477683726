use std::collections::BTreeMap;

use crate::{
    core::PropPatch,
    ease::Ease,
    error::{UnveilError, UnveilResult},
    stage::Stage,
    tween::{PropTween, Repeat, RepeatCount, sample_window},
};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct SequenceHandle(pub u64);

/// What one step does to its target element while its window is live.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub enum StepBody {
    /// Interpolates the target's props between two sparse patches.
    Tween { from: PropPatch, to: PropPatch },
    /// Writes an integer count-up `"0"` through `"{to}"` into the target's
    /// text, stepping on the eased progress.
    Count { to: u64 },
    /// Grows the target's text toward `text` one character at a time.
    TypeText { text: String },
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct StepSpec {
    pub target: String,
    pub body: StepBody,
    pub duration_s: f64,
    /// Start adjustment in seconds, relative to the previous step's end
    /// (relative to the sequence start for the first step). Negative values
    /// overlap the previous step.
    pub offset_s: f64,
    pub ease: Ease,
    pub repeat: Option<Repeat>,
}

impl StepSpec {
    pub fn tween(target: impl Into<String>, from: PropPatch, to: PropPatch, duration_s: f64) -> Self {
        Self {
            target: target.into(),
            body: StepBody::Tween { from, to },
            duration_s,
            offset_s: 0.0,
            ease: Ease::OutCubic,
            repeat: None,
        }
    }

    pub fn count(target: impl Into<String>, to: u64, duration_s: f64) -> Self {
        Self {
            target: target.into(),
            body: StepBody::Count { to },
            duration_s,
            offset_s: 0.0,
            ease: Ease::OutCubic,
            repeat: None,
        }
    }

    pub fn type_text(target: impl Into<String>, text: impl Into<String>, duration_s: f64) -> Self {
        Self {
            target: target.into(),
            body: StepBody::TypeText { text: text.into() },
            duration_s,
            offset_s: 0.0,
            ease: Ease::Linear,
            repeat: None,
        }
    }

    pub fn offset(mut self, offset_s: f64) -> Self {
        self.offset_s = offset_s;
        self
    }

    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    pub fn repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = Some(repeat);
        self
    }

    /// Seconds the step occupies on the timeline, repeats included. An
    /// infinite repeat counts a single play-through; validation only lets
    /// one sit in the final position.
    pub fn cycle_duration_s(&self) -> f64 {
        match self.repeat {
            Some(Repeat {
                count: RepeatCount::Finite(n),
                ..
            }) => self.duration_s * f64::from(n.max(1)),
            _ => self.duration_s,
        }
    }

    fn validate(&self, index: usize) -> UnveilResult<()> {
        if self.target.is_empty() {
            return Err(UnveilError::validation(format!(
                "step {index} has an empty target"
            )));
        }
        if !(self.duration_s.is_finite() && self.duration_s >= 0.0) {
            return Err(UnveilError::validation(format!(
                "step {index} duration must be >= 0"
            )));
        }
        if !self.offset_s.is_finite() {
            return Err(UnveilError::validation(format!(
                "step {index} offset must be finite"
            )));
        }
        if let Some(rep) = &self.repeat {
            rep.validate()?;
            if !matches!(self.body, StepBody::Tween { .. }) {
                return Err(UnveilError::validation(format!(
                    "step {index} repeats a non-tween body"
                )));
            }
        }
        match &self.body {
            StepBody::Tween { from, to } => {
                from.validate()?;
                to.validate()?;
                if from.is_empty() && to.is_empty() {
                    return Err(UnveilError::validation(format!(
                        "step {index} tween patches no properties"
                    )));
                }
            }
            StepBody::Count { .. } => {
                if !self.ease.is_bounded() {
                    return Err(UnveilError::validation(format!(
                        "step {index} count needs an ease that stays within [0, 1]"
                    )));
                }
            }
            StepBody::TypeText { .. } => {}
        }
        Ok(())
    }
}

/// An ordered run of steps over stage elements, scheduled as one unit and
/// reported back as one completion.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct SequenceSpec {
    pub name: String,
    /// Seconds between scheduling and the first step's timeline origin.
    pub delay_s: f64,
    pub steps: Vec<StepSpec>,
}

impl SequenceSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            delay_s: 0.0,
            steps: Vec::new(),
        }
    }

    pub fn delay(mut self, delay_s: f64) -> Self {
        self.delay_s = delay_s;
        self
    }

    pub fn step(mut self, step: StepSpec) -> Self {
        self.steps.push(step);
        self
    }

    /// Start seconds of each step relative to the sequence's timeline
    /// origin (post-delay). A negative offset on the first step clamps to 0.
    pub fn step_starts(&self) -> Vec<f64> {
        let mut starts = Vec::with_capacity(self.steps.len());
        let mut prev_end = 0.0;
        for (i, step) in self.steps.iter().enumerate() {
            let start = if i == 0 {
                step.offset_s.max(0.0)
            } else {
                prev_end + step.offset_s
            };
            starts.push(start);
            prev_end = start + step.cycle_duration_s();
        }
        starts
    }

    /// Seconds from the timeline origin to the last step's end, or `None`
    /// when an infinite repeat keeps the sequence alive forever.
    pub fn total_duration_s(&self) -> Option<f64> {
        let mut total: f64 = 0.0;
        for (start, step) in self.step_starts().into_iter().zip(&self.steps) {
            if matches!(
                step.repeat,
                Some(Repeat {
                    count: RepeatCount::Infinite,
                    ..
                })
            ) {
                return None;
            }
            total = total.max(start + step.cycle_duration_s());
        }
        Some(total)
    }

    pub fn validate(&self) -> UnveilResult<()> {
        if self.name.is_empty() {
            return Err(UnveilError::validation("sequence name must not be empty"));
        }
        if self.steps.is_empty() {
            return Err(UnveilError::validation(format!(
                "sequence '{}' has no steps",
                self.name
            )));
        }
        if !(self.delay_s.is_finite() && self.delay_s >= 0.0) {
            return Err(UnveilError::validation(format!(
                "sequence '{}' delay must be >= 0",
                self.name
            )));
        }
        for (i, step) in self.steps.iter().enumerate() {
            step.validate(i)?;
            let infinite = matches!(
                step.repeat,
                Some(Repeat {
                    count: RepeatCount::Infinite,
                    ..
                })
            );
            if infinite && i + 1 != self.steps.len() {
                return Err(UnveilError::validation(format!(
                    "sequence '{}': step {i} repeats forever but is not last",
                    self.name
                )));
            }
        }
        let starts = self.step_starts();
        for i in 1..starts.len() {
            if starts[i] < starts[i - 1] {
                return Err(UnveilError::validation(format!(
                    "sequence '{}': step {} would start before step {}",
                    self.name,
                    i,
                    i - 1
                )));
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub enum SequenceEvent {
    /// Every step has finished (or was dropped against a missing target);
    /// the handle is retired.
    Completed { handle: SequenceHandle, name: String },
}

#[derive(Clone, Debug)]
enum StepState {
    Pending,
    Active { tween: Option<PropTween> },
    Finished,
}

#[derive(Clone, Debug)]
struct ScheduledStep {
    spec: StepSpec,
    start_s: f64,
    state: StepState,
}

#[derive(Clone, Debug)]
struct RunningSequence {
    name: String,
    steps: Vec<ScheduledStep>,
}

/// Runs scheduled sequences against a [`Stage`], driven by the host clock.
///
/// All methods take the current time explicitly; nothing here owns a clock
/// or a thread. `advance` is the only mutation point for animated props, so
/// a host calling it once per frame gets deterministic output for a given
/// call series.
#[derive(Debug, Default)]
pub struct Sequencer {
    next_handle: u64,
    running: BTreeMap<u64, RunningSequence>,
}

impl Sequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and admits a sequence. Step windows are fixed against
    /// `now_s` immediately; targets are looked up lazily when each step
    /// first fires, so elements mounted between scheduling and the step's
    /// start are picked up.
    pub fn schedule(&mut self, spec: SequenceSpec, now_s: f64) -> UnveilResult<SequenceHandle> {
        spec.validate()?;
        if !now_s.is_finite() {
            return Err(UnveilError::validation("schedule time must be finite"));
        }
        let origin = now_s + spec.delay_s;
        let steps = spec
            .step_starts()
            .into_iter()
            .zip(spec.steps)
            .map(|(rel_start, step)| ScheduledStep {
                spec: step,
                start_s: origin + rel_start,
                state: StepState::Pending,
            })
            .collect();

        let handle = SequenceHandle(self.next_handle);
        self.next_handle += 1;
        self.running.insert(
            handle.0,
            RunningSequence {
                name: spec.name.clone(),
                steps,
            },
        );
        tracing::debug!(handle = handle.0, name = %spec.name, "sequence scheduled");
        Ok(handle)
    }

    /// Stops a sequence immediately; props keep whatever values were last
    /// written. Unknown or already-retired handles are a no-op.
    pub fn cancel(&mut self, handle: SequenceHandle) {
        if self.running.remove(&handle.0).is_some() {
            tracing::debug!(handle = handle.0, "sequence cancelled");
        }
    }

    pub fn is_active(&self, handle: SequenceHandle) -> bool {
        self.running.contains_key(&handle.0)
    }

    pub fn active_count(&self) -> usize {
        self.running.len()
    }

    /// Advances every running sequence to `now_s`, writing sampled values
    /// into the stage. Completions are reported in scheduling order.
    pub fn advance(&mut self, stage: &mut Stage, now_s: f64) -> Vec<SequenceEvent> {
        let mut events = Vec::new();
        let handles: Vec<u64> = self.running.keys().copied().collect();
        for h in handles {
            let mut finished = false;
            if let Some(seq) = self.running.get_mut(&h) {
                for step in &mut seq.steps {
                    advance_step(stage, step, now_s);
                }
                finished = seq
                    .steps
                    .iter()
                    .all(|s| matches!(s.state, StepState::Finished));
            }
            if finished {
                if let Some(seq) = self.running.remove(&h) {
                    tracing::debug!(handle = h, name = %seq.name, "sequence completed");
                    events.push(SequenceEvent::Completed {
                        handle: SequenceHandle(h),
                        name: seq.name,
                    });
                }
            }
        }
        events
    }
}

fn advance_step(stage: &mut Stage, step: &mut ScheduledStep, now_s: f64) {
    if matches!(step.state, StepState::Finished) || now_s < step.start_s {
        return;
    }

    if matches!(step.state, StepState::Pending) {
        if !stage.contains(&step.spec.target) {
            tracing::debug!(target = %step.spec.target, "step target not mounted, dropping step");
            step.state = StepState::Finished;
            return;
        }
        let tween = match &step.spec.body {
            StepBody::Tween { from, to } => {
                let current = stage.props(&step.spec.target).unwrap_or_default();
                Some(PropTween::between(current, from, to))
            }
            _ => None,
        };
        step.state = StepState::Active { tween };
    }

    let sample = sample_window(now_s - step.start_s, step.spec.duration_s, step.spec.repeat);
    let eased = step.spec.ease.apply(sample.progress);
    let eased_unit = eased.clamp(0.0, 1.0);

    let wrote = match (&step.state, &step.spec.body) {
        (StepState::Active { tween: Some(tw) }, _) => {
            stage.apply_patch(&step.spec.target, &tw.at(eased))
        }
        (_, StepBody::Count { to }) => stage.set_text(&step.spec.target, count_text(eased_unit, *to)),
        (_, StepBody::TypeText { text }) => {
            stage.set_text(&step.spec.target, char_prefix(text, eased_unit))
        }
        _ => false,
    };
    if !wrote {
        // Target unmounted mid-flight.
        step.state = StepState::Finished;
        return;
    }
    if sample.finished {
        step.state = StepState::Finished;
    }
}

fn count_text(t: f64, to: u64) -> String {
    let shown = ((t * to as f64).floor().max(0.0) as u64).min(to);
    shown.to_string()
}

fn char_prefix(text: &str, t: f64) -> String {
    let total = text.chars().count();
    let shown = ((t * total as f64).floor().max(0.0) as usize).min(total);
    text.chars().take(shown).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::VisualProps;

    fn fade_in(target: &str, duration_s: f64) -> StepSpec {
        StepSpec::tween(
            target,
            PropPatch::new().opacity(0.0),
            PropPatch::new().opacity(1.0),
            duration_s,
        )
        .ease(Ease::Linear)
    }

    #[test]
    fn spacing_follows_offsets() {
        let seq = SequenceSpec::new("loader")
            .step(fade_in("a", 0.8))
            .step(fade_in("b", 2.0).offset(-0.3))
            .step(fade_in("c", 0.8).offset(0.5));
        seq.validate().unwrap();
        let starts = seq.step_starts();
        assert!((starts[0] - 0.0).abs() < 1e-9);
        assert!((starts[1] - 0.5).abs() < 1e-9);
        assert!((starts[2] - 3.0).abs() < 1e-9);
        assert!((seq.total_duration_s().unwrap() - 3.8).abs() < 1e-9);
    }

    #[test]
    fn negative_first_offset_clamps_to_origin() {
        let seq = SequenceSpec::new("s").step(fade_in("a", 1.0).offset(-2.0));
        assert_eq!(seq.step_starts()[0], 0.0);
        seq.validate().unwrap();
    }

    #[test]
    fn out_of_order_offsets_are_rejected() {
        let seq = SequenceSpec::new("s")
            .step(fade_in("a", 1.0))
            .step(fade_in("b", 1.0).offset(-5.0));
        let err = seq.validate().unwrap_err();
        assert!(err.to_string().contains("would start before"));
    }

    #[test]
    fn infinite_repeat_must_sit_last() {
        let seq = SequenceSpec::new("s")
            .step(fade_in("a", 1.0).repeat(Repeat::forever()))
            .step(fade_in("b", 1.0));
        assert!(seq.validate().is_err());

        let seq = SequenceSpec::new("s")
            .step(fade_in("a", 1.0))
            .step(fade_in("b", 1.0).repeat(Repeat::forever().yoyo()));
        assert!(seq.validate().is_ok());
    }

    #[test]
    fn schedule_writes_and_completes() {
        let mut stage = Stage::new();
        stage.mount("a");
        let mut seq = Sequencer::new();
        let handle = seq
            .schedule(SequenceSpec::new("fade").step(fade_in("a", 1.0)), 0.0)
            .unwrap();

        assert!(seq.advance(&mut stage, 0.5).is_empty());
        assert!((stage.props("a").unwrap().opacity - 0.5).abs() < 1e-9);
        assert!(seq.is_active(handle));

        let events = seq.advance(&mut stage, 1.0);
        assert_eq!(
            events,
            vec![SequenceEvent::Completed {
                handle,
                name: "fade".into()
            }]
        );
        assert_eq!(stage.props("a").unwrap().opacity, 1.0);
        assert!(!seq.is_active(handle));
    }

    #[test]
    fn delay_holds_the_first_step() {
        let mut stage = Stage::new();
        stage.mount("a");
        let mut seq = Sequencer::new();
        seq.schedule(
            SequenceSpec::new("late").delay(1.0).step(fade_in("a", 1.0)),
            0.0,
        )
        .unwrap();

        seq.advance(&mut stage, 0.9);
        assert_eq!(stage.props("a").unwrap(), VisualProps::default());

        seq.advance(&mut stage, 1.5);
        assert!((stage.props("a").unwrap().opacity - 0.5).abs() < 1e-9);
    }

    #[test]
    fn missing_target_skips_without_blocking() {
        let mut stage = Stage::new();
        stage.mount("real");
        let mut seq = Sequencer::new();
        seq.schedule(
            SequenceSpec::new("s")
                .step(fade_in("ghost", 1.0))
                .step(fade_in("real", 1.0)),
            0.0,
        )
        .unwrap();

        seq.advance(&mut stage, 1.5);
        assert!((stage.props("real").unwrap().opacity - 0.5).abs() < 1e-9);
        let events = seq.advance(&mut stage, 2.0);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn cancel_stops_writes_and_is_idempotent() {
        let mut stage = Stage::new();
        stage.mount("a");
        let mut seq = Sequencer::new();
        let handle = seq
            .schedule(SequenceSpec::new("s").step(fade_in("a", 1.0)), 0.0)
            .unwrap();

        seq.advance(&mut stage, 0.25);
        let frozen = stage.props("a").unwrap().opacity;
        seq.cancel(handle);
        seq.cancel(handle);
        assert!(seq.advance(&mut stage, 0.75).is_empty());
        assert_eq!(stage.props("a").unwrap().opacity, frozen);
    }

    #[test]
    fn late_advance_catches_up_in_one_call() {
        let mut stage = Stage::new();
        stage.mount("a");
        stage.mount("b");
        let mut seq = Sequencer::new();
        seq.schedule(
            SequenceSpec::new("s")
                .step(fade_in("a", 0.5))
                .step(fade_in("b", 0.5)),
            0.0,
        )
        .unwrap();

        let events = seq.advance(&mut stage, 10.0);
        assert_eq!(events.len(), 1);
        assert_eq!(stage.props("a").unwrap().opacity, 1.0);
        assert_eq!(stage.props("b").unwrap().opacity, 1.0);
    }

    #[test]
    fn count_step_floors_the_eased_value() {
        let mut stage = Stage::new();
        stage.mount("stat");
        let mut seq = Sequencer::new();
        seq.schedule(
            SequenceSpec::new("count")
                .step(StepSpec::count("stat", 500, 2.0).ease(Ease::Linear)),
            0.0,
        )
        .unwrap();

        seq.advance(&mut stage, 1.0);
        assert_eq!(stage.text("stat"), Some("250"));
        seq.advance(&mut stage, 2.0);
        assert_eq!(stage.text("stat"), Some("500"));
    }

    #[test]
    fn count_step_never_steps_backwards() {
        let mut stage = Stage::new();
        stage.mount("stat");
        let mut seq = Sequencer::new();
        seq.schedule(
            SequenceSpec::new("count").step(StepSpec::count("stat", 500, 2.0)),
            0.0,
        )
        .unwrap();

        let mut last = 0u64;
        for frame in 0..=130u32 {
            seq.advance(&mut stage, f64::from(frame) / 60.0);
            let shown: u64 = stage.text("stat").unwrap().parse().unwrap();
            assert!(shown >= last, "frame {frame}: {shown} < {last}");
            last = shown;
        }
        assert_eq!(last, 500);
    }

    #[test]
    fn count_rejects_overshooting_ease() {
        let step = StepSpec::count("stat", 10, 1.0).ease(Ease::OutBack { overshoot: 1.7 });
        let err = SequenceSpec::new("s").step(step).validate().unwrap_err();
        assert!(err.to_string().contains("within [0, 1]"));
    }

    #[test]
    fn typewriter_grows_a_char_prefix() {
        let mut stage = Stage::new();
        stage.mount("tagline");
        let mut seq = Sequencer::new();
        seq.schedule(
            SequenceSpec::new("type").step(StepSpec::type_text("tagline", "héllo", 1.0)),
            0.0,
        )
        .unwrap();

        seq.advance(&mut stage, 0.5);
        assert_eq!(stage.text("tagline"), Some("hé"));
        seq.advance(&mut stage, 1.0);
        assert_eq!(stage.text("tagline"), Some("héllo"));
    }

    #[test]
    fn mid_flight_unmount_drops_the_step() {
        let mut stage = Stage::new();
        stage.mount("a");
        let mut seq = Sequencer::new();
        seq.schedule(SequenceSpec::new("s").step(fade_in("a", 1.0)), 0.0)
            .unwrap();

        seq.advance(&mut stage, 0.5);
        stage.unmount("a");
        let events = seq.advance(&mut stage, 0.75);
        assert_eq!(events.len(), 1);
        assert_eq!(seq.active_count(), 0);
    }

    #[test]
    fn yoyo_loop_keeps_the_sequence_alive() {
        let mut stage = Stage::new();
        stage.mount("cue");
        let mut seq = Sequencer::new();
        let float = StepSpec::tween(
            "cue",
            PropPatch::new().y(0.0),
            PropPatch::new().y(10.0),
            1.5,
        )
        .ease(Ease::InOutCubic)
        .repeat(Repeat::forever().yoyo());
        let handle = seq
            .schedule(SequenceSpec::new("float").step(float), 0.0)
            .unwrap();

        // Second iteration runs back toward the origin.
        seq.advance(&mut stage, 2.25);
        let y = stage.props("cue").unwrap().y;
        assert!(y > 0.0 && y < 10.0);

        assert!(seq.advance(&mut stage, 100.0).is_empty());
        assert!(seq.is_active(handle));
    }
}
