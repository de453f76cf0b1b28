// Copyright 2026 the Galaxy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame ticks and frame-rate limiting.
//!
//! - [`FrameTick`]: a frame opportunity delivered by the tick source
//! - [`FrameLimiter`]: skips ticks that arrive sooner than a target interval
//!
//! # Data flow
//!
//! 1. The backend's [`FrameScheduler`](crate::backend::FrameScheduler) fires a
//!    display-synchronized callback, which becomes a [`FrameTick`].
//! 2. The controller asks its [`FrameLimiter`] whether the tick should do any
//!    work. Skipped ticks still reschedule the loop.
//! 3. Executed ticks update uniforms and issue one draw.

use crate::time::{Duration, HostTime, Timebase};

/// A frame opportunity delivered by the tick source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameTick {
    /// Host time when the tick was generated (the rAF timestamp on the web).
    pub now: HostTime,
    /// Monotonically increasing frame counter.
    pub frame_index: u64,
}

/// Drops ticks that arrive sooner than a target interval after the last
/// executed one.
///
/// The first tick always runs. A limiter without an interval lets every
/// tick through.
#[derive(Clone, Copy, Debug)]
pub struct FrameLimiter {
    interval: Option<Duration>,
    last_executed: Option<HostTime>,
}

impl FrameLimiter {
    /// Creates a limiter that lets every tick through.
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            interval: None,
            last_executed: None,
        }
    }

    /// Creates a limiter capping execution at `max_fps` frames per second.
    ///
    /// Non-positive or non-finite rates disable limiting.
    #[must_use]
    pub fn with_max_fps(max_fps: f64, timebase: Timebase) -> Self {
        if !(max_fps.is_finite() && max_fps > 0.0) {
            return Self::unlimited();
        }
        #[expect(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "positive finite frame interval in nanoseconds fits in u64"
        )]
        let nanos = (1_000_000_000.0 / max_fps) as u64;
        Self {
            interval: Some(Duration::from_nanos(nanos, timebase)),
            last_executed: None,
        }
    }

    /// Returns the minimum spacing between executed ticks, if any.
    #[must_use]
    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    /// Decides whether the tick at `now` should execute, recording it if so.
    pub fn admit(&mut self, now: HostTime) -> bool {
        if let (Some(interval), Some(last)) = (self.interval, self.last_executed)
            && now.saturating_duration_since(last) < interval
        {
            return false;
        }
        self.last_executed = Some(now);
        true
    }
}
