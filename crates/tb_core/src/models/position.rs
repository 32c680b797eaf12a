//! Field-relative coordinate system
//!
//! ## Coordinate System
//!
//! **Relative coordinates** (stored in plays, emitted by playback):
//! - X: -0.5 = left touchline, 0.5 = right touchline (fraction of field width)
//! - Y: -0.5 = top edge, 0.5 = bottom edge (fraction of field height)
//! - (0, 0) is the center spot
//!
//! **Pixel coordinates** (handed in by a host while dragging):
//! - Measured from the field center in the host's render units
//!
//! Every producer of a [`Position`] goes through [`clamp_component`], so a stored
//! position is always on the field.

use serde::{Deserialize, Serialize};

/// Lower bound of a relative component
pub const FIELD_MIN: f64 = -0.5;

/// Upper bound of a relative component
pub const FIELD_MAX: f64 = 0.5;

/// Offset from field center as a fraction of field width/height
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const CENTER: Position = Position { x: 0.0, y: 0.0 };

    /// Build a position, clamping both components onto the field.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x: clamp_component(x), y: clamp_component(y) }
    }

    /// Build a position from values already known to be on the field.
    ///
    /// Used for compile-time formation tables.
    pub const fn raw(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Re-apply the field bounds (positions decoded from storage are not trusted).
    pub fn clamped(self) -> Self {
        Self::new(self.x, self.y)
    }

    pub fn is_on_field(&self) -> bool {
        (FIELD_MIN..=FIELD_MAX).contains(&self.x) && (FIELD_MIN..=FIELD_MAX).contains(&self.y)
    }
}

/// Clamp one relative component into `[-0.5, 0.5]`.
///
/// Non-finite input maps to the center line.
#[inline]
pub fn clamp_component(v: f64) -> f64 {
    if !v.is_finite() {
        return 0.0;
    }
    v.clamp(FIELD_MIN, FIELD_MAX)
}

/// Rendered field dimensions in host units (pixels)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FieldSize {
    pub width: f64,
    pub height: f64,
}

impl FieldSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Field with no usable area yet (image not loaded, container collapsed).
    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Convert a pixel offset from the field center into a clamped relative position.
    pub fn to_relative(&self, px: f64, py: f64) -> Position {
        if self.is_degenerate() {
            return Position::CENTER;
        }
        Position::new(px / self.width, py / self.height)
    }

    /// Convert a relative position into a pixel offset from the field center.
    pub fn to_absolute(&self, pos: Position) -> (f64, f64) {
        (pos.x * self.width, pos.y * self.height)
    }

    /// Shorter side, the reference length for piece sizes.
    pub fn min_dimension(&self) -> f64 {
        self.width.min(self.height)
    }

    /// Largest field with the image's aspect ratio that fits inside `container`.
    pub fn fit_within(container: FieldSize, image: FieldSize) -> FieldSize {
        if container.is_degenerate() || image.is_degenerate() {
            return FieldSize::default();
        }

        let image_ratio = image.width / image.height;
        let container_ratio = container.width / container.height;

        if container_ratio > image_ratio {
            // Container is wider than the image: height bound
            FieldSize::new(container.height * image_ratio, container.height)
        } else {
            FieldSize::new(container.width, container.width / image_ratio)
        }
    }
}
