use crate::error::{UnveilError, UnveilResult};

pub use kurbo::{Affine, Vec2};

/// The window the page is viewed through, in page coordinates.
///
/// `scroll_top` is the page-space y of the window's top edge; the window
/// extends `height` pixels downward from it.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    pub scroll_top: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(scroll_top: f64, height: f64) -> UnveilResult<Self> {
        if !scroll_top.is_finite() {
            return Err(UnveilError::validation("Viewport scroll_top must be finite"));
        }
        if !(height.is_finite() && height > 0.0) {
            return Err(UnveilError::validation("Viewport height must be > 0"));
        }
        Ok(Self { scroll_top, height })
    }

    /// Page-space y of the horizontal line sitting `frac` of the way down
    /// the window (0.0 = top edge, 1.0 = bottom edge).
    pub fn line(self, frac: f64) -> f64 {
        self.scroll_top + frac * self.height
    }
}

/// Page-space extent of one element, as measured by the host after layout.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ElementBounds {
    pub top: f64,
    pub height: f64,
}

impl ElementBounds {
    pub fn new(top: f64, height: f64) -> UnveilResult<Self> {
        if !top.is_finite() {
            return Err(UnveilError::validation("ElementBounds top must be finite"));
        }
        if !(height.is_finite() && height >= 0.0) {
            return Err(UnveilError::validation("ElementBounds height must be >= 0"));
        }
        Ok(Self { top, height })
    }

    pub fn bottom(self) -> f64 {
        self.top + self.height
    }
}

/// Animated visual state of one element. Hosts map these onto whatever
/// styling system they draw with; the engine only ever reads and writes
/// this struct.
///
/// `x`/`y` are offsets from the element's resting layout position, not
/// absolute page coordinates.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VisualProps {
    pub opacity: f64,
    pub x: f64,
    pub y: f64,
    pub scale: f64,
    pub rotation_rad: f64,
}

impl Default for VisualProps {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            x: 0.0,
            y: 0.0,
            scale: 1.0,
            rotation_rad: 0.0,
        }
    }
}

impl VisualProps {
    pub fn translation(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn to_affine(self) -> kurbo::Affine {
        let t_translate = kurbo::Affine::translate(self.translation());
        let t_rotate = kurbo::Affine::rotate(self.rotation_rad);
        let t_scale = kurbo::Affine::scale(self.scale);

        // Canonical order:
        // T(translate) * R(rot) * S(scale)
        t_translate * t_rotate * t_scale
    }
}

/// Sparse overrides for [`VisualProps`]. Fields left `None` are untouched
/// when the patch is applied, which is what lets two animations drive
/// different properties of the same element at once.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PropPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation_rad: Option<f64>,
}

impl PropPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn opacity(mut self, v: f64) -> Self {
        self.opacity = Some(v);
        self
    }

    pub fn x(mut self, v: f64) -> Self {
        self.x = Some(v);
        self
    }

    pub fn y(mut self, v: f64) -> Self {
        self.y = Some(v);
        self
    }

    pub fn scale(mut self, v: f64) -> Self {
        self.scale = Some(v);
        self
    }

    pub fn rotation_rad(mut self, v: f64) -> Self {
        self.rotation_rad = Some(v);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.opacity.is_none()
            && self.x.is_none()
            && self.y.is_none()
            && self.scale.is_none()
            && self.rotation_rad.is_none()
    }

    /// Overwrites the listed fields on `props`, leaving the rest alone.
    pub fn apply_to(&self, props: &mut VisualProps) {
        if let Some(v) = self.opacity {
            props.opacity = v;
        }
        if let Some(v) = self.x {
            props.x = v;
        }
        if let Some(v) = self.y {
            props.y = v;
        }
        if let Some(v) = self.scale {
            props.scale = v;
        }
        if let Some(v) = self.rotation_rad {
            props.rotation_rad = v;
        }
    }

    pub fn validate(&self) -> UnveilResult<()> {
        let fields = [
            ("opacity", self.opacity),
            ("x", self.x),
            ("y", self.y),
            ("scale", self.scale),
            ("rotation_rad", self.rotation_rad),
        ];
        for (name, value) in fields {
            if let Some(v) = value {
                if !v.is_finite() {
                    return Err(UnveilError::validation(format!(
                        "PropPatch {name} must be finite"
                    )));
                }
            }
        }
        Ok(())
    }
}
