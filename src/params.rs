use crate::color::{self, RGBA8};

/// The smallest blur radius a shadow can have. A blur with no radius is
/// degenerate, so smaller values are clamped up to this.
pub const MIN_RADIUS: f32 = 0.1;

pub const DEFAULT_RADIUS: f32 = 30.0;
pub const DEFAULT_OFFSET_X: f32 = 15.0;
pub const DEFAULT_OFFSET_Y: f32 = 15.0;
pub const DEFAULT_SPREAD: f32 = 0.0;
pub const DEFAULT_COLOR: RGBA8 = color::DARK_GRAY;

/// Clamps a blur radius to [`MIN_RADIUS`]. `NaN` is treated as zero.
#[inline]
pub fn clamp_radius(radius: f32) -> f32 {
    radius.max(MIN_RADIUS)
}

/// The parameters of a drop shadow.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ShadowParameters {
    /// Whether the shadow is drawn at all.
    pub enabled: bool,

    /// The blur radius in logical points.
    ///
    /// Values below [`MIN_RADIUS`] are clamped when the parameters are
    /// applied to a compositor.
    pub radius: f32,

    /// The horizontal displacement of the shadow in logical points.
    pub offset_x: f32,

    /// The vertical displacement of the shadow in logical points.
    pub offset_y: f32,

    /// How much the shadow grows (positive) or shrinks (negative) relative to
    /// the content, in logical points.
    pub spread: f32,

    /// The shadow color. Its alpha channel is the opacity of the shadow.
    pub color: RGBA8,
}

impl Default for ShadowParameters {
    fn default() -> Self {
        Self {
            enabled: true,
            radius: DEFAULT_RADIUS,
            offset_x: DEFAULT_OFFSET_X,
            offset_y: DEFAULT_OFFSET_Y,
            spread: DEFAULT_SPREAD,
            color: DEFAULT_COLOR,
        }
    }
}

impl ShadowParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> ShadowParametersBuilder {
        ShadowParametersBuilder::new()
    }

    /// Returns a copy with all invariants enforced.
    pub fn normalized(mut self) -> Self {
        let radius = clamp_radius(self.radius);
        if radius != self.radius {
            log::debug!("clamped shadow radius {} to {}", self.radius, radius);
            self.radius = radius;
        }
        self
    }

    /// The opacity of the shadow in the range `0.0..=1.0`.
    pub fn opacity(&self) -> f32 {
        f32::from(self.color.a) / f32::from(color::MAX_ALPHA)
    }
}

pub struct ShadowParametersBuilder {
    params: ShadowParameters,
}

impl ShadowParametersBuilder {
    pub fn new() -> Self {
        Self {
            params: ShadowParameters::default(),
        }
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.params.enabled = enabled;
        self
    }

    /// The blur radius in logical points. Clamped to [`MIN_RADIUS`].
    pub fn radius(mut self, radius: f32) -> Self {
        self.params.radius = clamp_radius(radius);
        self
    }

    pub fn offset(mut self, offset_x: f32, offset_y: f32) -> Self {
        self.params.offset_x = offset_x;
        self.params.offset_y = offset_y;
        self
    }

    pub fn spread(mut self, spread: f32) -> Self {
        self.params.spread = spread;
        self
    }

    pub fn color(mut self, color: impl Into<RGBA8>) -> Self {
        self.params.color = color.into();
        self
    }

    pub fn build(self) -> ShadowParameters {
        self.params
    }
}

impl Default for ShadowParametersBuilder {
    fn default() -> Self {
        Self::new()
    }
}
