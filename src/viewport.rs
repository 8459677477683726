use crate::{
    core::{ElementBounds, Viewport},
    error::{UnveilError, UnveilResult},
};

/// Window-relative thresholds deciding when a scroll-bound animation is
/// live for a watched element.
///
/// `enter_frac` places a horizontal line down the window (0.0 top edge,
/// 1.0 bottom edge); the element is entered once its top rises past that
/// line. With an `exit_frac`, the element additionally leaves once its
/// bottom rises past the exit line, which turns the pair into a band the
/// element can re-enter from either direction.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TriggerRegion {
    pub enter_frac: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_frac: Option<f64>,
}

impl TriggerRegion {
    pub fn enter_at(enter_frac: f64) -> Self {
        Self {
            enter_frac,
            exit_frac: None,
        }
    }

    pub fn with_exit(mut self, exit_frac: f64) -> Self {
        self.exit_frac = Some(exit_frac);
        self
    }

    pub fn validate(&self) -> UnveilResult<()> {
        if !(self.enter_frac.is_finite() && (0.0..=1.0).contains(&self.enter_frac)) {
            return Err(UnveilError::validation(
                "TriggerRegion enter_frac must be within [0, 1]",
            ));
        }
        if let Some(exit) = self.exit_frac {
            if !(exit.is_finite() && (0.0..=1.0).contains(&exit)) {
                return Err(UnveilError::validation(
                    "TriggerRegion exit_frac must be within [0, 1]",
                ));
            }
        }
        Ok(())
    }

    /// True while `bounds` sits inside the region for the given window.
    /// Pure in its inputs; hysteresis lives with the caller.
    pub fn contains(&self, viewport: Viewport, bounds: ElementBounds) -> bool {
        let entered = bounds.top <= viewport.line(self.enter_frac);
        match self.exit_frac {
            None => entered,
            Some(exit) => entered && bounds.bottom() >= viewport.line(exit),
        }
    }
}
