// Copyright 2026 the Galaxy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend contract for platform integrations.
//!
//! The controller never touches a platform API directly. A backend crate
//! provides three pieces:
//!
//! - **Host**: implements [`Host`]. It owns the drawing surface inside the
//!   caller's container, measures it, creates the [`GpuDevice`], and
//!   registers and removes the resize and pointer listeners. Listener
//!   callbacks forward into the controller's `resize`, `pointer_move` and
//!   `pointer_leave` methods.
//!
//! - **Tick source**: implements [`FrameScheduler`]. Each request delivers
//!   at most one display-synchronized callback that the backend turns into
//!   a [`FrameTick`](crate::timing::FrameTick) for the controller's
//!   `on_frame`.
//!
//! - **Time**: `now() -> HostTime` and `timebase() -> Timebase` free
//!   functions that read the platform's monotonic clock.
//!
//! Test doubles for all three live in `galaxy_harness`, which lets the
//! controller be driven frame by frame without a browser.
//!
//! # Frame loop pseudocode
//!
//! ```rust,ignore
//! fn on_tick(tick: FrameTick) {
//!     if !limiter.admit(tick.now) {
//!         scheduler.request_frame();
//!         return;
//!     }
//!     interaction.step(config.pointer_lerp);
//!     renderer.draw(&mut device, elapsed_ms, &interaction);
//!     scheduler.request_frame();
//! }
//! ```

use alloc::string::String;
use kurbo::Size;

use crate::error::{InitError, ShaderStage};

/// A value for one program uniform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UniformValue {
    /// `float`.
    Float(f32),
    /// `int` or `bool`.
    Int(i32),
    /// `vec2`.
    Vec2([f32; 2]),
    /// `vec3`.
    Vec3([f32; 3]),
    /// Column-major `mat4`.
    Mat4([f32; 16]),
}

/// Primitive topology for a draw call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// Independent triangles.
    Triangles,
    /// Point sprites.
    Points,
}

/// Blend state for the draw call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Blend {
    /// Overwrite the destination.
    Off,
    /// `src * alpha + dst`.
    Additive,
    /// `src * alpha + dst * (1 - alpha)`.
    Alpha,
}

/// The subset of a GPU context the renderers use.
///
/// Handles are owned values; each `delete_*` consumes the handle so a
/// resource cannot be released twice through this trait.
pub trait GpuDevice {
    /// A compiled or uncompiled shader object.
    type Shader;
    /// A program object.
    type Program;
    /// A vertex buffer.
    type Buffer;
    /// A resolved uniform location.
    type Uniform;

    /// Creates a shader object and sets its source. `None` if the context
    /// refused.
    fn create_shader(&mut self, stage: ShaderStage, source: &str) -> Option<Self::Shader>;

    /// Compiles a shader.
    ///
    /// # Errors
    ///
    /// Returns the driver's info log on failure.
    fn compile_shader(&mut self, shader: &Self::Shader) -> Result<(), String>;

    /// Deletes a shader object.
    fn delete_shader(&mut self, shader: Self::Shader);

    /// Creates an empty program object.
    fn create_program(&mut self) -> Option<Self::Program>;

    /// Attaches a compiled shader to a program.
    fn attach_shader(&mut self, program: &Self::Program, shader: &Self::Shader);

    /// Links a program.
    ///
    /// # Errors
    ///
    /// Returns the driver's info log on failure.
    fn link_program(&mut self, program: &Self::Program) -> Result<(), String>;

    /// Deletes a program object.
    fn delete_program(&mut self, program: Self::Program);

    /// Creates a static vertex buffer holding `data`.
    fn create_buffer(&mut self, data: &[u8]) -> Option<Self::Buffer>;

    /// Deletes a vertex buffer.
    fn delete_buffer(&mut self, buffer: Self::Buffer);

    /// Makes `program` current.
    fn use_program(&mut self, program: &Self::Program);

    /// Looks up a uniform; `None` if the program does not use it.
    fn uniform_location(&mut self, program: &Self::Program, name: &str) -> Option<Self::Uniform>;

    /// Feeds float attribute `name` from `buffer`, `components` floats per
    /// vertex. Returns `false` if the program has no such attribute.
    fn bind_attribute(
        &mut self,
        program: &Self::Program,
        name: &str,
        buffer: &Self::Buffer,
        components: i32,
    ) -> bool;

    /// Uploads a uniform value to the current program.
    fn set_uniform(&mut self, location: &Self::Uniform, value: UniformValue);

    /// Sets the viewport to the full drawing buffer.
    fn viewport(&mut self, width: u32, height: u32);

    /// Sets the blend state.
    fn set_blend(&mut self, blend: Blend);

    /// Clears the drawing buffer to transparent black.
    fn clear(&mut self);

    /// Draws `count` vertices from the bound attributes.
    fn draw(&mut self, primitive: Primitive, count: usize);

    /// Whether the context was lost since creation.
    fn is_context_lost(&self) -> bool {
        false
    }
}

/// Handle for a pending frame callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameRequest(pub u64);

/// Display-synchronized callback scheduling.
pub trait FrameScheduler {
    /// Requests one callback for the next displayable frame.
    fn request_frame(&mut self) -> FrameRequest;

    /// Cancels a pending request. Cancelling a request that already fired is
    /// a no-op.
    fn cancel_frame(&mut self, request: FrameRequest);
}

/// The platform side of one mount: surface, context and listeners.
pub trait Host {
    /// The GPU context this host creates.
    type Device: GpuDevice;

    /// Creates the drawing surface inside the container and its context.
    ///
    /// # Errors
    ///
    /// [`InitError::ContextUnavailable`] if no compatible context exists.
    fn create_device(&mut self) -> Result<Self::Device, InitError>;

    /// The container's layout box in CSS pixels, or `None` if there is
    /// nothing to measure.
    fn surface_size(&self) -> Option<Size>;

    /// Ratio of device pixels to CSS pixels.
    fn device_pixel_ratio(&self) -> f64 {
        1.0
    }

    /// Resizes the drawing buffer to the given device-pixel size.
    fn set_drawing_buffer_size(&mut self, width: u32, height: u32);

    /// Starts delivering resize notifications. Returns whether a listener
    /// was registered; without one the drawing buffer keeps its mount size.
    fn listen_resize(&mut self) -> bool;

    /// Stops delivering resize notifications.
    fn unlisten_resize(&mut self);

    /// Starts delivering pointer move and leave notifications.
    fn listen_pointer(&mut self);

    /// Stops delivering pointer notifications.
    fn unlisten_pointer(&mut self);

    /// Removes the drawing surface from the container. Must tolerate being
    /// called when no surface was created.
    fn detach_surface(&mut self);
}
