// Copyright 2026 the Galaxy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lifecycle and interaction controller for one mounted background.
//!
//! ```text
//! Uninitialized ──mount──▶ Initializing ──ok──▶ Running ──teardown──▶ TornDown
//!                               │                  │
//!                               └──error──▶ Failed ◀┘ context lost
//! ```
//!
//! [`Galaxy`] owns everything one mount needs: the config snapshot, the
//! host, the device, the scheduler, the renderer, the interaction state and
//! the frame limiter. The backend calls its methods from listener and frame
//! callbacks; none of those callbacks draws except [`Galaxy::on_frame`].

use kurbo::{Point, Rect};
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::backend::{FrameRequest, FrameScheduler, GpuDevice, Host};
use crate::config::RenderConfig;
use crate::error::InitError;
use crate::interaction::{InteractionState, PointerSpace};
use crate::renderer::{GpuResources, Renderer};
use crate::time::{HostTime, Timebase};
use crate::timing::{FrameLimiter, FrameTick};
use crate::trace::{
    ContextLostEvent, FrameEvent, FrameSkippedEvent, MountEvent, PointerEvent, PointerKind,
    ResizeEvent, TeardownEvent, Tracer,
};

/// Where a mounted instance is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    /// Constructed, not yet mounted.
    Uninitialized,
    /// Creating GPU objects.
    Initializing,
    /// Frame loop active.
    Running,
    /// Released by teardown. Terminal.
    TornDown,
    /// Initialization or the frame loop failed; everything is released.
    /// Terminal.
    Failed,
}

impl LifecycleState {
    /// Whether no further transitions are possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::TornDown | Self::Failed)
    }
}

/// One mounted animated background.
pub struct Galaxy<H: Host, S: FrameScheduler> {
    config: RenderConfig,
    host: H,
    scheduler: S,
    timebase: Timebase,
    state: LifecycleState,
    device: Option<H::Device>,
    resources: GpuResources<H::Device>,
    renderer: Option<Renderer<H::Device>>,
    interaction: InteractionState,
    pointer_space: PointerSpace,
    limiter: FrameLimiter,
    pending: Option<FrameRequest>,
    listening_resize: bool,
    listening_pointer: bool,
    surface_attached: bool,
    started: Option<HostTime>,
    size: (u32, u32),
    frames_rendered: u64,
    frames_skipped: u64,
}

impl<H: Host, S: FrameScheduler> Galaxy<H, S> {
    /// Creates an unmounted instance. Nothing touches the platform until
    /// [`mount`](Self::mount).
    #[must_use]
    pub fn new(config: RenderConfig, host: H, scheduler: S, timebase: Timebase) -> Self {
        let pointer_space = PointerSpace::for_strategy(config.strategy);
        let limiter = match config.max_fps {
            Some(fps) => FrameLimiter::with_max_fps(fps, timebase),
            None => FrameLimiter::unlimited(),
        };
        Self {
            config,
            host,
            scheduler,
            timebase,
            state: LifecycleState::Uninitialized,
            device: None,
            resources: GpuResources::new(),
            renderer: None,
            interaction: InteractionState::new(pointer_space.center()),
            pointer_space,
            limiter,
            pending: None,
            listening_resize: false,
            listening_pointer: false,
            surface_attached: false,
            started: None,
            size: (0, 0),
            frames_rendered: 0,
            frames_skipped: 0,
        }
    }

    /// Builds every GPU object, registers listeners and requests the first
    /// frame.
    ///
    /// All work happens synchronously. `seed` feeds particle generation.
    ///
    /// # Errors
    ///
    /// On any [`InitError`] the instance moves to [`LifecycleState::Failed`]
    /// with everything it created already released, and no frame is
    /// requested.
    pub fn mount(&mut self, seed: u64, tracer: &mut Tracer<'_>) -> Result<(), InitError> {
        if self.state != LifecycleState::Uninitialized {
            return Err(InitError::AlreadyMounted);
        }
        self.state = LifecycleState::Initializing;

        match self.initialize(seed) {
            Ok(()) => {
                self.listening_resize = self.host.listen_resize();
                if self.config.wants_pointer() {
                    self.host.listen_pointer();
                    self.listening_pointer = true;
                }
                self.pending = Some(self.scheduler.request_frame());
                self.state = LifecycleState::Running;
                tracer.mount(&MountEvent {
                    strategy: self.config.strategy,
                    width: self.size.0,
                    height: self.size.1,
                    gpu_resources: self.resources.len(),
                });
                Ok(())
            }
            Err(e) => {
                self.release();
                self.state = LifecycleState::Failed;
                tracer.init_failed(&e);
                Err(e)
            }
        }
    }

    fn initialize(&mut self, seed: u64) -> Result<(), InitError> {
        let css = self.host.surface_size().ok_or(InitError::InvalidSurface)?;
        if !(css.width.is_finite() && css.height.is_finite()) {
            return Err(InitError::InvalidSurface);
        }
        self.surface_attached = true;
        let mut device = self.host.create_device()?;

        let mut rng = SmallRng::seed_from_u64(seed);
        let built = Renderer::build(&self.config, &mut device, &mut self.resources, &mut rng);
        self.device = Some(device);
        self.renderer = Some(built?);
        self.apply_size();
        Ok(())
    }

    /// Executes one frame if the instance is running and the limiter admits
    /// the tick, then requests the next one.
    ///
    /// Ticks delivered after teardown or failure do nothing and request
    /// nothing.
    pub fn on_frame(&mut self, tick: FrameTick, tracer: &mut Tracer<'_>) {
        if self.state != LifecycleState::Running {
            return;
        }
        self.pending = None;

        if self.device.as_ref().is_some_and(|d| d.is_context_lost()) {
            let released = self.release();
            self.state = LifecycleState::Failed;
            tracer.context_lost(&ContextLostEvent {
                frame_index: tick.frame_index,
                now: tick.now,
                frames_rendered: self.frames_rendered,
                gpu_resources_released: released,
            });
            return;
        }

        if !self.limiter.admit(tick.now) {
            self.frames_skipped += 1;
            tracer.frame_skipped(&FrameSkippedEvent {
                frame_index: tick.frame_index,
                now: tick.now,
            });
            self.pending = Some(self.scheduler.request_frame());
            return;
        }

        let started = *self.started.get_or_insert(tick.now);
        let elapsed = tick.now.saturating_duration_since(started);
        let elapsed_ms = self.timebase.ticks_to_millis(elapsed.ticks());

        self.interaction.step(f64::from(self.config.pointer_lerp));
        if let (Some(renderer), Some(device)) = (&mut self.renderer, &mut self.device) {
            renderer.draw(device, elapsed_ms, &mut self.interaction);
        }
        self.frames_rendered += 1;
        tracer.frame(&FrameEvent {
            frame_index: tick.frame_index,
            now: tick.now,
            elapsed,
        });

        self.pending = Some(self.scheduler.request_frame());
    }

    /// Records a pointer position given in client coordinates, with `bounds`
    /// the surface's client rectangle.
    pub fn pointer_move(&mut self, client: Point, bounds: Rect, tracer: &mut Tracer<'_>) {
        if self.state != LifecycleState::Running {
            return;
        }
        let position = self.pointer_space.map(client, bounds);
        self.interaction.pointer_move(position);
        tracer.pointer(&PointerEvent {
            kind: PointerKind::Move,
            position: Some(position),
        });
    }

    /// Records that the pointer left the surface.
    pub fn pointer_leave(&mut self, tracer: &mut Tracer<'_>) {
        if self.state != LifecycleState::Running {
            return;
        }
        self.interaction.pointer_leave();
        tracer.pointer(&PointerEvent {
            kind: PointerKind::Leave,
            position: None,
        });
    }

    /// Re-measures the container and updates the drawing buffer, viewport
    /// and resolution-dependent uniforms.
    pub fn resize(&mut self, tracer: &mut Tracer<'_>) {
        if self.state != LifecycleState::Running {
            return;
        }
        self.apply_size();
        let (width, height) = self.size;
        tracer.resize(&ResizeEvent {
            width,
            height,
            aspect: aspect(width, height),
        });
    }

    fn apply_size(&mut self) {
        let Some(css) = self.host.surface_size() else {
            return;
        };
        let dpr = self.host.device_pixel_ratio();
        let dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
        let (width, height) = (to_pixels(css.width * dpr), to_pixels(css.height * dpr));

        self.host.set_drawing_buffer_size(width, height);
        if let (Some(renderer), Some(device)) = (&mut self.renderer, &mut self.device) {
            device.viewport(width, height);
            renderer.resize(device, width, height);
        }
        self.size = (width, height);
    }

    /// Stops the instance and releases everything it registered or created.
    ///
    /// Order: resize listener, pointer listeners, pending frame, GPU objects,
    /// drawing surface. Safe to call in any state and any number of times;
    /// only the first call on a mounted instance does work. Returns whether
    /// this call did anything.
    pub fn teardown(&mut self, tracer: &mut Tracer<'_>) -> bool {
        if self.state.is_terminal() {
            return false;
        }
        let released = self.release();
        self.state = LifecycleState::TornDown;
        tracer.teardown(&TeardownEvent {
            frames_rendered: self.frames_rendered,
            frames_skipped: self.frames_skipped,
            gpu_resources_released: released,
        });
        true
    }

    /// Releases whatever is still held; each piece at most once.
    fn release(&mut self) -> usize {
        if self.listening_resize {
            self.host.unlisten_resize();
            self.listening_resize = false;
        }
        if self.listening_pointer {
            self.host.unlisten_pointer();
            self.listening_pointer = false;
        }
        if let Some(request) = self.pending.take() {
            self.scheduler.cancel_frame(request);
        }
        self.renderer = None;
        let mut released = 0;
        if let Some(mut device) = self.device.take() {
            released = self.resources.release(&mut device);
        }
        if self.surface_attached {
            self.host.detach_surface();
            self.surface_attached = false;
        }
        released
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// The config this instance was built with.
    #[must_use]
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Drawing-buffer size in device pixels.
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Interaction state consumed by the next frame.
    #[must_use]
    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    /// The active renderer, while running.
    #[must_use]
    pub fn renderer(&self) -> Option<&Renderer<H::Device>> {
        self.renderer.as_ref()
    }

    /// The host.
    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The frame scheduler.
    #[must_use]
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Whether a frame callback is currently requested.
    #[must_use]
    pub fn has_pending_frame(&self) -> bool {
        self.pending.is_some()
    }

    /// Frames executed so far.
    #[must_use]
    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Ticks the limiter dropped so far.
    #[must_use]
    pub fn frames_skipped(&self) -> u64 {
        self.frames_skipped
    }
}

impl<H: Host, S: FrameScheduler> core::fmt::Debug for Galaxy<H, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Galaxy")
            .field("state", &self.state)
            .field("strategy", &self.config.strategy)
            .field("size", &self.size)
            .field("frames_rendered", &self.frames_rendered)
            .field("frames_skipped", &self.frames_skipped)
            .field("resources", &self.resources)
            .finish_non_exhaustive()
    }
}

fn to_pixels(css: f64) -> u32 {
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "clamped to the u32 range first"
    )]
    let px = css.round().clamp(0.0, f64::from(u32::MAX)) as u32;
    px
}

fn aspect(width: u32, height: u32) -> f32 {
    if height == 0 {
        1.0
    } else {
        width as f32 / height as f32
    }
}
