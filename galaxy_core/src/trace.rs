// Copyright 2026 the Galaxy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the mount lifecycle and frame loop.
//!
//! [`TraceSink`] has one method per event, all defaulting to no-ops. The
//! controller reports through a [`Tracer`], which wraps an optional
//! `&mut dyn TraceSink` supplied by the host for each call.
//!
//! With the `trace` feature **off**, every `Tracer` method compiles to
//! nothing. With it **on**, each method performs one `Option` branch before
//! dispatching.

use kurbo::Point;

use crate::config::Strategy;
use crate::error::InitError;
use crate::time::{Duration, HostTime};

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when a mount reaches the running state.
#[derive(Clone, Copy, Debug)]
pub struct MountEvent {
    /// Strategy that was mounted.
    pub strategy: Strategy,
    /// Drawing-buffer width in pixels.
    pub width: u32,
    /// Drawing-buffer height in pixels.
    pub height: u32,
    /// GPU resources created during initialization.
    pub gpu_resources: usize,
}

/// Emitted for every executed frame.
#[derive(Clone, Copy, Debug)]
pub struct FrameEvent {
    /// Frame counter from the tick.
    pub frame_index: u64,
    /// Host time of the tick.
    pub now: HostTime,
    /// Time since the first executed frame.
    pub elapsed: Duration,
}

/// Emitted for ticks the frame limiter dropped.
#[derive(Clone, Copy, Debug)]
pub struct FrameSkippedEvent {
    /// Frame counter from the tick.
    pub frame_index: u64,
    /// Host time of the tick.
    pub now: HostTime,
}

/// Emitted after the surface was resized.
#[derive(Clone, Copy, Debug)]
pub struct ResizeEvent {
    /// New drawing-buffer width in pixels.
    pub width: u32,
    /// New drawing-buffer height in pixels.
    pub height: u32,
    /// Width over height, as uploaded to the renderer.
    pub aspect: f32,
}

/// Kind of pointer input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerKind {
    /// Pointer moved over the surface.
    Move,
    /// Pointer left the surface.
    Leave,
}

/// Emitted for pointer input that reached the interaction state.
#[derive(Clone, Copy, Debug)]
pub struct PointerEvent {
    /// Move or leave.
    pub kind: PointerKind,
    /// Position in the renderer's pointer space, for moves.
    pub position: Option<Point>,
}

/// Emitted when the rendering context was lost while running. The instance
/// has stopped and released its resources.
#[derive(Clone, Copy, Debug)]
pub struct ContextLostEvent {
    /// Frame counter of the tick that noticed the loss.
    pub frame_index: u64,
    /// Host time of that tick.
    pub now: HostTime,
    /// Frames that executed before the loss.
    pub frames_rendered: u64,
    /// GPU resources released.
    pub gpu_resources_released: usize,
}

/// Emitted once when an instance is torn down.
#[derive(Clone, Copy, Debug)]
pub struct TeardownEvent {
    /// Frames that executed.
    pub frames_rendered: u64,
    /// Ticks the limiter dropped.
    pub frames_skipped: u64,
    /// GPU resources released.
    pub gpu_resources_released: usize,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the controller.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a mount reaches the running state.
    fn on_mount(&mut self, e: &MountEvent) {
        _ = e;
    }

    /// Called when a mount fails; the error text carries the driver log.
    fn on_init_failed(&mut self, e: &InitError) {
        _ = e;
    }

    /// Called for every executed frame.
    fn on_frame(&mut self, e: &FrameEvent) {
        _ = e;
    }

    /// Called for ticks dropped by the frame limiter.
    fn on_frame_skipped(&mut self, e: &FrameSkippedEvent) {
        _ = e;
    }

    /// Called after a resize was applied.
    fn on_resize(&mut self, e: &ResizeEvent) {
        _ = e;
    }

    /// Called for pointer input.
    fn on_pointer(&mut self, e: &PointerEvent) {
        _ = e;
    }

    /// Called when the context is lost and the loop stops.
    fn on_context_lost(&mut self, e: &ContextLostEvent) {
        _ = e;
    }

    /// Called once on teardown.
    fn on_teardown(&mut self, e: &TeardownEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

macro_rules! dispatch {
    ($(#[$doc:meta])* $name:ident => $method:ident($ty:ty)) => {
        $(#[$doc])*
        #[inline]
        pub fn $name(&mut self, e: &$ty) {
            #[cfg(feature = "trace")]
            if let Some(s) = &mut self.sink {
                s.$method(e);
            }
            #[cfg(not(feature = "trace"))]
            {
                _ = e;
            }
        }
    };
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    dispatch!(
        /// Emits a [`MountEvent`].
        mount => on_mount(MountEvent)
    );
    dispatch!(
        /// Emits an initialization failure.
        init_failed => on_init_failed(InitError)
    );
    dispatch!(
        /// Emits a [`FrameEvent`].
        frame => on_frame(FrameEvent)
    );
    dispatch!(
        /// Emits a [`FrameSkippedEvent`].
        frame_skipped => on_frame_skipped(FrameSkippedEvent)
    );
    dispatch!(
        /// Emits a [`ResizeEvent`].
        resize => on_resize(ResizeEvent)
    );
    dispatch!(
        /// Emits a [`PointerEvent`].
        pointer => on_pointer(PointerEvent)
    );
    dispatch!(
        /// Emits a [`ContextLostEvent`].
        context_lost => on_context_lost(ContextLostEvent)
    );
    dispatch!(
        /// Emits a [`TeardownEvent`].
        teardown => on_teardown(TeardownEvent)
    );
}
