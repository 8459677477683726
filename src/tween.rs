use crate::{
    core::{PropPatch, Vec2, VisualProps},
    error::{UnveilError, UnveilResult},
};

pub trait Lerp: Sized {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for Vec2 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Vec2::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
    }
}

impl Lerp for VisualProps {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Self {
            opacity: <f64 as Lerp>::lerp(&a.opacity, &b.opacity, t),
            x: <f64 as Lerp>::lerp(&a.x, &b.x, t),
            y: <f64 as Lerp>::lerp(&a.y, &b.y, t),
            scale: <f64 as Lerp>::lerp(&a.scale, &b.scale, t),
            rotation_rad: <f64 as Lerp>::lerp(&a.rotation_rad, &b.rotation_rad, t),
        }
    }
}

/// How a tween window repeats after its first play-through.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Repeat {
    pub count: RepeatCount,
    /// Odd iterations run backwards, so the value sweeps out and back.
    pub yoyo: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum RepeatCount {
    /// Total number of play-throughs, first included. Must be > 0.
    Finite(u32),
    Infinite,
}

impl Repeat {
    pub fn times(count: u32) -> Self {
        Self {
            count: RepeatCount::Finite(count),
            yoyo: false,
        }
    }

    pub fn forever() -> Self {
        Self {
            count: RepeatCount::Infinite,
            yoyo: false,
        }
    }

    pub fn yoyo(mut self) -> Self {
        self.yoyo = true;
        self
    }

    pub fn validate(&self) -> UnveilResult<()> {
        if self.count == RepeatCount::Finite(0) {
            return Err(UnveilError::animation("Repeat count must be > 0"));
        }
        Ok(())
    }
}

/// Result of sampling one animation window at a point in time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindowSample {
    /// Normalized position inside the current iteration, in `[0, 1]`.
    pub progress: f64,
    /// True once the window has nothing further to play.
    pub finished: bool,
}

/// Maps seconds elapsed since a window's start to normalized progress,
/// honoring the repeat policy. Negative elapsed clamps to the start; a
/// non-positive duration finishes immediately.
///
/// A finished yoyo with an even iteration count rests at progress 0, since
/// the final backward sweep returns the value to where it began.
pub fn sample_window(elapsed_s: f64, duration_s: f64, repeat: Option<Repeat>) -> WindowSample {
    let elapsed = elapsed_s.max(0.0);
    if duration_s <= 0.0 {
        return WindowSample {
            progress: 1.0,
            finished: true,
        };
    }

    match repeat {
        None => {
            let frac = elapsed / duration_s;
            if frac >= 1.0 {
                WindowSample {
                    progress: 1.0,
                    finished: true,
                }
            } else {
                WindowSample {
                    progress: frac,
                    finished: false,
                }
            }
        }
        Some(rep) => {
            if let RepeatCount::Finite(n) = rep.count {
                let total = duration_s * f64::from(n);
                if elapsed >= total {
                    let rest = if rep.yoyo && n % 2 == 0 { 0.0 } else { 1.0 };
                    return WindowSample {
                        progress: rest,
                        finished: true,
                    };
                }
            }
            let iteration = (elapsed / duration_s).floor();
            let frac = elapsed / duration_s - iteration;
            let backwards = rep.yoyo && (iteration as u64) % 2 == 1;
            WindowSample {
                progress: if backwards { 1.0 - frac } else { frac },
                finished: false,
            }
        }
    }
}

/// A resolved interpolation window over one element's properties.
///
/// Built at activation time from the element's current props: a field named
/// only in `from` animates back to its current value, a field named only in
/// `to` animates away from it. Fields named in neither stay untouched, so
/// concurrent tweens on disjoint properties of one element do not clobber
/// each other.
#[derive(Clone, Debug)]
pub struct PropTween {
    start: PropPatch,
    end: PropPatch,
}

impl PropTween {
    pub fn between(current: VisualProps, from: &PropPatch, to: &PropPatch) -> Self {
        fn resolve(
            from: Option<f64>,
            to: Option<f64>,
            current: f64,
        ) -> (Option<f64>, Option<f64>) {
            match (from, to) {
                (None, None) => (None, None),
                (f, t) => (Some(f.unwrap_or(current)), Some(t.unwrap_or(current))),
            }
        }

        let (opacity_s, opacity_e) = resolve(from.opacity, to.opacity, current.opacity);
        let (x_s, x_e) = resolve(from.x, to.x, current.x);
        let (y_s, y_e) = resolve(from.y, to.y, current.y);
        let (scale_s, scale_e) = resolve(from.scale, to.scale, current.scale);
        let (rot_s, rot_e) = resolve(from.rotation_rad, to.rotation_rad, current.rotation_rad);

        Self {
            start: PropPatch {
                opacity: opacity_s,
                x: x_s,
                y: y_s,
                scale: scale_s,
                rotation_rad: rot_s,
            },
            end: PropPatch {
                opacity: opacity_e,
                x: x_e,
                y: y_e,
                scale: scale_e,
                rotation_rad: rot_e,
            },
        }
    }

    /// Patch to write at eased progress `eased`. Only the fields the tween
    /// was declared over are present.
    pub fn at(&self, eased: f64) -> PropPatch {
        fn mix(s: Option<f64>, e: Option<f64>, t: f64) -> Option<f64> {
            match (s, e) {
                (Some(a), Some(b)) => Some(<f64 as Lerp>::lerp(&a, &b, t)),
                _ => None,
            }
        }

        PropPatch {
            opacity: mix(self.start.opacity, self.end.opacity, eased),
            x: mix(self.start.x, self.end.x, eased),
            y: mix(self.start.y, self.end.y, eased),
            scale: mix(self.start.scale, self.end.scale, eased),
            rotation_rad: mix(self.start.rotation_rad, self.end.rotation_rad, eased),
        }
    }

    pub fn start_patch(&self) -> PropPatch {
        self.start
    }

    pub fn end_patch(&self) -> PropPatch {
        self.end
    }
}
