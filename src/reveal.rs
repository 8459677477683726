use std::collections::BTreeMap;

use crate::{
    core::{PropPatch, Viewport},
    ease::Ease,
    error::{UnveilError, UnveilResult},
    stage::Stage,
    tween::{PropTween, sample_window},
    viewport::TriggerRegion,
};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct RevealToken(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum RevealMode {
    /// Fires on first entry and never again, even after scrolling away and
    /// back. The entry stays registered but inert until unregistered.
    Once,
    /// Plays forward on entry and backward on exit, any number of times.
    Reversible,
}

/// What a reveal plays when its trigger fires.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub enum RevealEffect {
    /// Interpolates the element's props from a hidden patch to a shown one.
    /// On exit (reversible mode) the element animates from wherever it
    /// currently is back to the hidden patch.
    Tween { from: PropPatch, to: PropPatch },
    /// Counts the element's text up from `"0"` to `"{to}"`.
    Count { to: u64 },
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct RevealEntry {
    /// Element whose props or text the effect writes.
    pub element: String,
    /// Element whose bounds are tested against the region. Often a whole
    /// section while `element` is one item inside it.
    pub watched: String,
    pub region: TriggerRegion,
    pub effect: RevealEffect,
    pub duration_s: f64,
    pub ease: Ease,
    /// Lag between the trigger firing and the transition starting. Gives
    /// list items their stagger.
    pub delay_s: f64,
    pub mode: RevealMode,
}

impl RevealEntry {
    pub fn once(
        element: impl Into<String>,
        region: TriggerRegion,
        effect: RevealEffect,
        duration_s: f64,
    ) -> Self {
        let element = element.into();
        Self {
            watched: element.clone(),
            element,
            region,
            effect,
            duration_s,
            ease: Ease::OutCubic,
            delay_s: 0.0,
            mode: RevealMode::Once,
        }
    }

    pub fn reversible(
        element: impl Into<String>,
        region: TriggerRegion,
        effect: RevealEffect,
        duration_s: f64,
    ) -> Self {
        Self {
            mode: RevealMode::Reversible,
            ..Self::once(element, region, effect, duration_s)
        }
    }

    pub fn watched(mut self, watched: impl Into<String>) -> Self {
        self.watched = watched.into();
        self
    }

    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    pub fn delay(mut self, delay_s: f64) -> Self {
        self.delay_s = delay_s;
        self
    }

    pub fn validate(&self) -> UnveilResult<()> {
        if self.element.is_empty() {
            return Err(UnveilError::validation("reveal element must not be empty"));
        }
        if self.watched.is_empty() {
            return Err(UnveilError::validation(format!(
                "reveal '{}' watches an empty key",
                self.element
            )));
        }
        self.region.validate()?;
        if !(self.duration_s.is_finite() && self.duration_s >= 0.0) {
            return Err(UnveilError::validation(format!(
                "reveal '{}' duration must be >= 0",
                self.element
            )));
        }
        if !(self.delay_s.is_finite() && self.delay_s >= 0.0) {
            return Err(UnveilError::validation(format!(
                "reveal '{}' delay must be >= 0",
                self.element
            )));
        }
        match &self.effect {
            RevealEffect::Tween { from, to } => {
                from.validate()?;
                to.validate()?;
                if from.is_empty() && to.is_empty() {
                    return Err(UnveilError::validation(format!(
                        "reveal '{}' tween patches no properties",
                        self.element
                    )));
                }
            }
            RevealEffect::Count { .. } => {
                if self.mode != RevealMode::Once {
                    return Err(UnveilError::validation(format!(
                        "reveal '{}': count effects must use once mode",
                        self.element
                    )));
                }
                if !self.ease.is_bounded() {
                    return Err(UnveilError::validation(format!(
                        "reveal '{}': count needs an ease that stays within [0, 1]",
                        self.element
                    )));
                }
            }
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum RevealDirection {
    Enter,
    Exit,
}

/// A trigger crossing observed during `publish`.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct RevealEvent {
    pub token: RevealToken,
    pub element: String,
    pub direction: RevealDirection,
}

#[derive(Clone, Debug)]
struct Flight {
    direction: RevealDirection,
    start_s: f64,
    activated: bool,
    tween: Option<PropTween>,
}

#[derive(Clone, Debug)]
struct Registered {
    entry: RevealEntry,
    inside: bool,
    fired: bool,
    flight: Option<Flight>,
}

/// Scroll-trigger registry. `publish` turns viewport changes into firing
/// decisions; `advance` plays the resulting transitions against the stage.
///
/// At most one transition per entry is ever in flight. A reversible entry
/// interrupted mid-play replaces its flight with one starting from the
/// element's current values, so direction changes never jump.
#[derive(Debug, Default)]
pub struct Revealer {
    next_token: u64,
    entries: BTreeMap<u64, Registered>,
}

impl Revealer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, entry: RevealEntry) -> UnveilResult<RevealToken> {
        entry.validate()?;
        let token = RevealToken(self.next_token);
        self.next_token += 1;
        tracing::debug!(token = token.0, element = %entry.element, "reveal registered");
        self.entries.insert(
            token.0,
            Registered {
                entry,
                inside: false,
                fired: false,
                flight: None,
            },
        );
        Ok(token)
    }

    /// Drops the entry and any in-flight transition. Safe at any point in
    /// an entry's lifecycle; unknown tokens are a no-op.
    pub fn unregister(&mut self, token: RevealToken) {
        if self.entries.remove(&token.0).is_some() {
            tracing::debug!(token = token.0, "reveal unregistered");
        }
    }

    pub fn is_registered(&self, token: RevealToken) -> bool {
        self.entries.contains_key(&token.0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Re-evaluates every entry against the new viewport and fires the ones
    /// whose inside/outside state flipped. Returns the crossings in
    /// registration order; transitions start playing on the next `advance`.
    ///
    /// Entries whose watched element has no bounds yet are left untouched.
    #[tracing::instrument(skip(self, stage))]
    pub fn publish(&mut self, viewport: Viewport, now_s: f64, stage: &Stage) -> Vec<RevealEvent> {
        let mut events = Vec::new();
        for (id, reg) in self.entries.iter_mut() {
            let bounds = match stage.bounds(&reg.entry.watched) {
                Some(b) => b,
                None => continue,
            };
            let now_inside = reg.entry.region.contains(viewport, bounds);
            let was_inside = reg.inside;
            reg.inside = now_inside;
            if now_inside == was_inside {
                continue;
            }

            let direction = match reg.entry.mode {
                RevealMode::Once => {
                    if !now_inside || reg.fired {
                        continue;
                    }
                    reg.fired = true;
                    RevealDirection::Enter
                }
                RevealMode::Reversible => {
                    if now_inside {
                        RevealDirection::Enter
                    } else {
                        RevealDirection::Exit
                    }
                }
            };

            // Replaces any flight still playing the other way.
            reg.flight = Some(Flight {
                direction,
                start_s: now_s + reg.entry.delay_s,
                activated: false,
                tween: None,
            });
            tracing::debug!(token = *id, element = %reg.entry.element, ?direction, "reveal fired");
            events.push(RevealEvent {
                token: RevealToken(*id),
                element: reg.entry.element.clone(),
                direction,
            });
        }
        events
    }

    /// Plays in-flight transitions up to `now_s`, writing into the stage.
    pub fn advance(&mut self, stage: &mut Stage, now_s: f64) {
        for reg in self.entries.values_mut() {
            let mut done = false;
            if let Some(flight) = reg.flight.as_mut() {
                if now_s < flight.start_s {
                    continue;
                }
                if !flight.activated {
                    flight.activated = true;
                    if !stage.contains(&reg.entry.element) {
                        tracing::debug!(element = %reg.entry.element, "reveal target not mounted, dropping");
                        done = true;
                    } else if let RevealEffect::Tween { from, to } = &reg.entry.effect {
                        let current = stage.props(&reg.entry.element).unwrap_or_default();
                        flight.tween = Some(match flight.direction {
                            RevealDirection::Enter => PropTween::between(current, from, to),
                            // Back from wherever we are to the hidden patch.
                            RevealDirection::Exit => {
                                PropTween::between(current, &PropPatch::new(), from)
                            }
                        });
                    }
                }

                if !done {
                    let sample =
                        sample_window(now_s - flight.start_s, reg.entry.duration_s, None);
                    let eased = reg.entry.ease.apply(sample.progress);
                    let wrote = match (&flight.tween, &reg.entry.effect) {
                        (Some(tw), _) => stage.apply_patch(&reg.entry.element, &tw.at(eased)),
                        (None, RevealEffect::Count { to }) => {
                            let t = eased.clamp(0.0, 1.0);
                            let shown = ((t * *to as f64).floor().max(0.0) as u64).min(*to);
                            stage.set_text(&reg.entry.element, shown.to_string())
                        }
                        (None, RevealEffect::Tween { .. }) => false,
                    };
                    if !wrote || sample.finished {
                        done = true;
                    }
                }
            }
            if done {
                reg.flight = None;
            }
        }
    }
}
