// Copyright 2026 the Galaxy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer tracking with exponential smoothing.
//!
//! Listeners only write targets; the frame loop calls
//! [`InteractionState::step`] once per executed frame to move the smoothed
//! values toward them. Nothing in here draws.

use kurbo::{Point, Rect};
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::config::Strategy;
use crate::math::Vec3;

/// Coordinate space a renderer wants pointer positions in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerSpace {
    /// `0..=1` on both axes, origin bottom-left (y up).
    Normalized,
    /// `-1..=1` on both axes, origin at the center (y up).
    Ndc,
}

impl PointerSpace {
    /// The space each strategy consumes.
    #[must_use]
    pub const fn for_strategy(strategy: Strategy) -> Self {
        match strategy {
            Strategy::Procedural => Self::Normalized,
            Strategy::PointCloud => Self::Ndc,
        }
    }

    /// Where the pointer rests before any input: the surface center.
    #[must_use]
    pub const fn center(self) -> Point {
        match self {
            Self::Normalized => Point::new(0.5, 0.5),
            Self::Ndc => Point::ORIGIN,
        }
    }

    /// Maps a client-space position (y down) inside `bounds` into this space.
    ///
    /// Degenerate bounds map to the center.
    #[must_use]
    pub fn map(self, client: Point, bounds: Rect) -> Point {
        let (w, h) = (bounds.width(), bounds.height());
        if w <= 0.0 || h <= 0.0 {
            return self.center();
        }
        let x = (client.x - bounds.x0) / w;
        let y = 1.0 - (client.y - bounds.y0) / h;
        match self {
            Self::Normalized => Point::new(x, y),
            Self::Ndc => Point::new(x * 2.0 - 1.0, y * 2.0 - 1.0),
        }
    }
}

/// Z spin of the point cloud per millisecond of speed-scaled time: 0.01
/// radians per 60 Hz frame.
pub const Z_RADIANS_PER_MS: f64 = 0.01 * 60.0 / 1000.0;

/// Per-mount pointer and rotation state.
#[derive(Clone, Debug, PartialEq)]
pub struct InteractionState {
    target_pointer: Point,
    smoothed_pointer: Point,
    target_active: f64,
    smoothed_active: f64,
    rotation: Vec3,
}

impl InteractionState {
    /// Creates state with both pointers resting at `rest` and no activity.
    #[must_use]
    pub fn new(rest: Point) -> Self {
        Self {
            target_pointer: rest,
            smoothed_pointer: rest,
            target_active: 0.0,
            smoothed_active: 0.0,
            rotation: Vec3::ZERO,
        }
    }

    /// Records a pointer position and marks the pointer as present.
    pub fn pointer_move(&mut self, position: Point) {
        self.target_pointer = position;
        self.target_active = 1.0;
    }

    /// Marks the pointer as gone; the activity fades out over later frames.
    pub fn pointer_leave(&mut self) {
        self.target_active = 0.0;
    }

    /// Moves the smoothed values a `lerp` fraction toward their targets.
    pub fn step(&mut self, lerp: f64) {
        self.smoothed_pointer = self.smoothed_pointer.lerp(self.target_pointer, lerp);
        self.smoothed_active += (self.target_active - self.smoothed_active) * lerp;
    }

    /// Sets the point-cloud rotation for `scaled_ms` of speed-scaled elapsed
    /// time.
    ///
    /// X and Y wobble as slow sinusoids; Z grows linearly at
    /// [`Z_RADIANS_PER_MS`], so the spin rate does not depend on how often
    /// frames run.
    pub fn advance_rotation(&mut self, scaled_ms: f64) {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "angles are uploaded as f32"
        )]
        let (x, y, z) = (
            ((scaled_ms * 0.0002).sin() * 0.1) as f32,
            ((scaled_ms * 0.0005).cos() * 0.15) as f32,
            (scaled_ms * Z_RADIANS_PER_MS) as f32,
        );
        self.rotation = Vec3::new(x, y, z);
    }

    /// Latest raw pointer position.
    #[inline]
    #[must_use]
    pub fn target_pointer(&self) -> Point {
        self.target_pointer
    }

    /// Smoothed pointer position.
    #[inline]
    #[must_use]
    pub fn smoothed_pointer(&self) -> Point {
        self.smoothed_pointer
    }

    /// Smoothed hover activity in `0..=1`.
    #[inline]
    #[must_use]
    pub fn smoothed_active(&self) -> f64 {
        self.smoothed_active
    }

    /// Current rotation angles in radians.
    #[inline]
    #[must_use]
    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }
}
