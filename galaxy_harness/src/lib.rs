// Copyright 2026 the Galaxy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Test doubles for driving a [`Galaxy`](galaxy_core::controller::Galaxy)
//! frame by frame without a browser.
//!
//! - [`MockHost`] implements [`Host`]. Its surface size, device pixel ratio
//!   and context availability can be changed while the controller owns it.
//! - [`RecordingDevice`] implements [`GpuDevice`] and counts every object it
//!   creates and deletes. It can be told to fail compilation, linking or
//!   buffer creation.
//! - [`ManualScheduler`] implements [`FrameScheduler`]. Requests stay pending
//!   until [`fire`](ManualScheduler::fire) is called.
//! - [`FrameClock`] produces evenly spaced [`FrameTick`]s.
//!
//! A host and the devices it creates append every listener, frame and
//! release call to one [`CallLog`]. A scheduler built with
//! [`ManualScheduler::with_calls`] appends to the same log, so tests can
//! check the order of a teardown.
//!
//! Every double is a cheap handle over shared state: clone it before moving
//! it into the controller and keep the clone to inspect it.

#![no_std]

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::format;
use alloc::rc::Rc;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::cell::RefCell;

use galaxy_core::backend::{
    Blend, FrameRequest, FrameScheduler, GpuDevice, Host, Primitive, UniformValue,
};
use galaxy_core::error::{InitError, ShaderStage};
use galaxy_core::time::{Duration, HostTime};
use galaxy_core::timing::FrameTick;
use kurbo::Size;

// ---------------------------------------------------------------------------
// Call log
// ---------------------------------------------------------------------------

/// A call one of the doubles received.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Call {
    /// [`Host::listen_resize`].
    ListenResize,
    /// [`Host::unlisten_resize`].
    UnlistenResize,
    /// [`Host::listen_pointer`].
    ListenPointer,
    /// [`Host::unlisten_pointer`].
    UnlistenPointer,
    /// [`FrameScheduler::request_frame`].
    RequestFrame,
    /// [`FrameScheduler::cancel_frame`] on a pending request.
    CancelFrame,
    /// [`GpuDevice::delete_shader`].
    DeleteShader,
    /// [`GpuDevice::delete_program`].
    DeleteProgram,
    /// [`GpuDevice::delete_buffer`].
    DeleteBuffer,
    /// [`Host::detach_surface`].
    DetachSurface,
}

/// Shared, ordered record of [`Call`]s.
pub type CallLog = Rc<RefCell<Vec<Call>>>;

// ---------------------------------------------------------------------------
// Faults
// ---------------------------------------------------------------------------

/// A failure the [`RecordingDevice`] injects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DeviceFault {
    /// Everything succeeds.
    #[default]
    None,
    /// Compiling a shader of this stage fails.
    Compile(ShaderStage),
    /// Linking fails.
    Link,
    /// Buffer creation returns `None`.
    Buffer,
}

// ---------------------------------------------------------------------------
// RecordingDevice
// ---------------------------------------------------------------------------

/// An owned GPU object handle. Not `Clone`, so each one is deleted at most
/// once through [`GpuDevice`].
#[derive(Debug, PartialEq, Eq)]
pub struct Handle(pub u32);

/// What a [`RecordingDevice`] saw.
#[derive(Clone, Debug, Default)]
pub struct DeviceLog {
    /// Shaders created.
    pub shaders_created: usize,
    /// Shaders deleted.
    pub shaders_deleted: usize,
    /// Programs created.
    pub programs_created: usize,
    /// Programs deleted.
    pub programs_deleted: usize,
    /// Buffers created.
    pub buffers_created: usize,
    /// Buffers deleted.
    pub buffers_deleted: usize,
    /// Bytes uploaded per created buffer, in creation order.
    pub buffer_sizes: Vec<usize>,
    /// Attribute name and component count, in bind order.
    pub attributes: Vec<(String, i32)>,
    /// Last value uploaded per uniform name.
    pub uniforms: BTreeMap<String, UniformValue>,
    /// Number of uniform uploads.
    pub uniform_writes: usize,
    /// Last viewport.
    pub viewport: Option<(u32, u32)>,
    /// Last blend state.
    pub blend: Option<Blend>,
    /// Clears issued.
    pub clears: usize,
    /// Every draw call.
    pub draws: Vec<(Primitive, usize)>,
    /// Reported by [`GpuDevice::is_context_lost`].
    pub context_lost: bool,
}

impl DeviceLog {
    /// Objects created and not yet deleted.
    #[must_use]
    pub fn live_objects(&self) -> usize {
        (self.shaders_created - self.shaders_deleted)
            + (self.programs_created - self.programs_deleted)
            + (self.buffers_created - self.buffers_deleted)
    }

    /// Total objects created.
    #[must_use]
    pub fn created(&self) -> usize {
        self.shaders_created + self.programs_created + self.buffers_created
    }
}

/// A [`GpuDevice`] that records calls instead of rendering.
#[derive(Debug)]
pub struct RecordingDevice {
    log: Rc<RefCell<DeviceLog>>,
    calls: CallLog,
    fault: DeviceFault,
    stages: BTreeMap<u32, ShaderStage>,
    next_id: u32,
}

impl RecordingDevice {
    /// Creates a device writing to `log`.
    #[must_use]
    pub fn new(log: Rc<RefCell<DeviceLog>>, fault: DeviceFault) -> Self {
        Self {
            log,
            calls: CallLog::default(),
            fault,
            stages: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Appends deletions to `calls` as well.
    #[must_use]
    pub fn with_calls(mut self, calls: CallLog) -> Self {
        self.calls = calls;
        self
    }

    fn handle(&mut self) -> Handle {
        let id = self.next_id;
        self.next_id += 1;
        Handle(id)
    }
}

impl GpuDevice for RecordingDevice {
    type Shader = Handle;
    type Program = Handle;
    type Buffer = Handle;
    type Uniform = String;

    fn create_shader(&mut self, stage: ShaderStage, _source: &str) -> Option<Handle> {
        let handle = self.handle();
        self.stages.insert(handle.0, stage);
        self.log.borrow_mut().shaders_created += 1;
        Some(handle)
    }

    fn compile_shader(&mut self, shader: &Handle) -> Result<(), String> {
        match (self.fault, self.stages.get(&shader.0)) {
            (DeviceFault::Compile(failing), Some(&stage)) if failing == stage => {
                Err(format!("ERROR: 0:1: {stage} shader rejected"))
            }
            _ => Ok(()),
        }
    }

    fn delete_shader(&mut self, shader: Handle) {
        self.stages.remove(&shader.0);
        self.log.borrow_mut().shaders_deleted += 1;
        self.calls.borrow_mut().push(Call::DeleteShader);
    }

    fn create_program(&mut self) -> Option<Handle> {
        self.log.borrow_mut().programs_created += 1;
        Some(self.handle())
    }

    fn attach_shader(&mut self, _program: &Handle, _shader: &Handle) {}

    fn link_program(&mut self, _program: &Handle) -> Result<(), String> {
        if self.fault == DeviceFault::Link {
            Err("ERROR: varying mismatch".to_string())
        } else {
            Ok(())
        }
    }

    fn delete_program(&mut self, _program: Handle) {
        self.log.borrow_mut().programs_deleted += 1;
        self.calls.borrow_mut().push(Call::DeleteProgram);
    }

    fn create_buffer(&mut self, data: &[u8]) -> Option<Handle> {
        if self.fault == DeviceFault::Buffer {
            return None;
        }
        {
            let mut log = self.log.borrow_mut();
            log.buffers_created += 1;
            log.buffer_sizes.push(data.len());
        }
        Some(self.handle())
    }

    fn delete_buffer(&mut self, _buffer: Handle) {
        self.log.borrow_mut().buffers_deleted += 1;
        self.calls.borrow_mut().push(Call::DeleteBuffer);
    }

    fn use_program(&mut self, _program: &Handle) {}

    fn uniform_location(&mut self, _program: &Handle, name: &str) -> Option<String> {
        Some(name.to_string())
    }

    fn bind_attribute(
        &mut self,
        _program: &Handle,
        name: &str,
        _buffer: &Handle,
        components: i32,
    ) -> bool {
        self.log
            .borrow_mut()
            .attributes
            .push((name.to_string(), components));
        true
    }

    fn set_uniform(&mut self, location: &String, value: UniformValue) {
        let mut log = self.log.borrow_mut();
        log.uniforms.insert(location.clone(), value);
        log.uniform_writes += 1;
    }

    fn viewport(&mut self, width: u32, height: u32) {
        self.log.borrow_mut().viewport = Some((width, height));
    }

    fn set_blend(&mut self, blend: Blend) {
        self.log.borrow_mut().blend = Some(blend);
    }

    fn clear(&mut self) {
        self.log.borrow_mut().clears += 1;
    }

    fn draw(&mut self, primitive: Primitive, count: usize) {
        self.log.borrow_mut().draws.push((primitive, count));
    }

    fn is_context_lost(&self) -> bool {
        self.log.borrow().context_lost
    }
}

// ---------------------------------------------------------------------------
// MockHost
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct HostState {
    size: Option<Size>,
    device_pixel_ratio: f64,
    context_available: bool,
    resize_events: bool,
    fault: DeviceFault,
    surface_attached: bool,
    drawing_buffer: (u32, u32),
    resize_listeners: i32,
    pointer_listeners: i32,
    detach_calls: usize,
}

/// A [`Host`] with a scripted container.
///
/// Clones share state.
#[derive(Clone, Debug)]
pub struct MockHost {
    state: Rc<RefCell<HostState>>,
    log: Rc<RefCell<DeviceLog>>,
    calls: CallLog,
}

impl MockHost {
    /// Creates a host whose container measures `size` CSS pixels.
    #[must_use]
    pub fn new(size: Size) -> Self {
        Self {
            state: Rc::new(RefCell::new(HostState {
                size: Some(size),
                device_pixel_ratio: 1.0,
                context_available: true,
                resize_events: true,
                fault: DeviceFault::None,
                surface_attached: false,
                drawing_buffer: (0, 0),
                resize_listeners: 0,
                pointer_listeners: 0,
                detach_calls: 0,
            })),
            log: Rc::new(RefCell::new(DeviceLog::default())),
            calls: CallLog::default(),
        }
    }

    /// Injects a fault into devices created from now on.
    #[must_use]
    pub fn with_fault(self, fault: DeviceFault) -> Self {
        self.state.borrow_mut().fault = fault;
        self
    }

    /// Makes [`create_device`](Host::create_device) fail.
    #[must_use]
    pub fn without_context(self) -> Self {
        self.state.borrow_mut().context_available = false;
        self
    }

    /// Makes [`listen_resize`](Host::listen_resize) report that no listener
    /// could be registered.
    #[must_use]
    pub fn without_resize_events(self) -> Self {
        self.state.borrow_mut().resize_events = false;
        self
    }

    /// Handle to the call log, for sharing with a [`ManualScheduler`].
    #[must_use]
    pub fn call_log(&self) -> CallLog {
        Rc::clone(&self.calls)
    }

    /// Snapshot of the calls seen so far.
    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// Changes the container size; `None` removes it from layout.
    pub fn set_size(&self, size: Option<Size>) {
        self.state.borrow_mut().size = size;
    }

    /// Changes the device pixel ratio.
    pub fn set_device_pixel_ratio(&self, dpr: f64) {
        self.state.borrow_mut().device_pixel_ratio = dpr;
    }

    /// Marks the context as lost.
    pub fn lose_context(&self) {
        self.log.borrow_mut().context_lost = true;
    }

    /// Snapshot of the device log.
    #[must_use]
    pub fn device_log(&self) -> DeviceLog {
        self.log.borrow().clone()
    }

    /// Last uploaded value of uniform `name`.
    #[must_use]
    pub fn uniform(&self, name: &str) -> Option<UniformValue> {
        self.log.borrow().uniforms.get(name).copied()
    }

    /// GPU objects created and not yet deleted.
    #[must_use]
    pub fn live_objects(&self) -> usize {
        self.log.borrow().live_objects()
    }

    /// Registered resize listeners.
    #[must_use]
    pub fn resize_listeners(&self) -> i32 {
        self.state.borrow().resize_listeners
    }

    /// Registered pointer listeners.
    #[must_use]
    pub fn pointer_listeners(&self) -> i32 {
        self.state.borrow().pointer_listeners
    }

    /// Whether a drawing surface is in the container.
    #[must_use]
    pub fn surface_attached(&self) -> bool {
        self.state.borrow().surface_attached
    }

    /// Times [`detach_surface`](Host::detach_surface) was called.
    #[must_use]
    pub fn detach_calls(&self) -> usize {
        self.state.borrow().detach_calls
    }

    /// Current drawing-buffer size in device pixels.
    #[must_use]
    pub fn drawing_buffer(&self) -> (u32, u32) {
        self.state.borrow().drawing_buffer
    }
}

impl Host for MockHost {
    type Device = RecordingDevice;

    fn create_device(&mut self) -> Result<RecordingDevice, InitError> {
        let mut state = self.state.borrow_mut();
        state.surface_attached = true;
        if !state.context_available {
            return Err(InitError::ContextUnavailable);
        }
        let device = RecordingDevice::new(Rc::clone(&self.log), state.fault);
        Ok(device.with_calls(self.call_log()))
    }

    fn surface_size(&self) -> Option<Size> {
        self.state.borrow().size
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.state.borrow().device_pixel_ratio
    }

    fn set_drawing_buffer_size(&mut self, width: u32, height: u32) {
        self.state.borrow_mut().drawing_buffer = (width, height);
    }

    fn listen_resize(&mut self) -> bool {
        let mut state = self.state.borrow_mut();
        if !state.resize_events {
            return false;
        }
        state.resize_listeners += 1;
        self.calls.borrow_mut().push(Call::ListenResize);
        true
    }

    fn unlisten_resize(&mut self) {
        self.state.borrow_mut().resize_listeners -= 1;
        self.calls.borrow_mut().push(Call::UnlistenResize);
    }

    fn listen_pointer(&mut self) {
        self.state.borrow_mut().pointer_listeners += 1;
        self.calls.borrow_mut().push(Call::ListenPointer);
    }

    fn unlisten_pointer(&mut self) {
        self.state.borrow_mut().pointer_listeners -= 1;
        self.calls.borrow_mut().push(Call::UnlistenPointer);
    }

    fn detach_surface(&mut self) {
        let mut state = self.state.borrow_mut();
        state.surface_attached = false;
        state.detach_calls += 1;
        self.calls.borrow_mut().push(Call::DetachSurface);
    }
}

// ---------------------------------------------------------------------------
// ManualScheduler
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct SchedulerState {
    next_id: u64,
    pending: Vec<FrameRequest>,
    cancelled: Vec<FrameRequest>,
    requested: u64,
}

/// A [`FrameScheduler`] whose callbacks fire only when the test says so.
///
/// Clones share state.
#[derive(Clone, Debug, Default)]
pub struct ManualScheduler {
    state: Rc<RefCell<SchedulerState>>,
    calls: CallLog,
}

impl ManualScheduler {
    /// Creates a scheduler with nothing pending.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a scheduler that appends to `calls`, usually a host's
    /// [`call_log`](MockHost::call_log).
    #[must_use]
    pub fn with_calls(calls: CallLog) -> Self {
        Self {
            state: Rc::default(),
            calls,
        }
    }

    /// Removes the oldest pending request, as if its callback fired.
    /// Returns `false` if nothing was pending.
    pub fn fire(&self) -> bool {
        let mut state = self.state.borrow_mut();
        if state.pending.is_empty() {
            false
        } else {
            state.pending.remove(0);
            true
        }
    }

    /// Requests not yet fired or cancelled.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.state.borrow().pending.len()
    }

    /// Requests cancelled so far.
    #[must_use]
    pub fn cancelled(&self) -> usize {
        self.state.borrow().cancelled.len()
    }

    /// Requests made so far.
    #[must_use]
    pub fn requested(&self) -> u64 {
        self.state.borrow().requested
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameRequest {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        state.requested += 1;
        let request = FrameRequest(state.next_id);
        state.pending.push(request);
        self.calls.borrow_mut().push(Call::RequestFrame);
        request
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        let mut state = self.state.borrow_mut();
        if let Some(i) = state.pending.iter().position(|r| *r == request) {
            state.pending.remove(i);
            state.cancelled.push(request);
            self.calls.borrow_mut().push(Call::CancelFrame);
        }
    }
}

// ---------------------------------------------------------------------------
// FrameClock
// ---------------------------------------------------------------------------

/// Produces ticks spaced by a fixed interval.
#[derive(Clone, Copy, Debug)]
pub struct FrameClock {
    now: HostTime,
    interval: Duration,
    frame_index: u64,
}

impl FrameClock {
    /// First tick at `start`, then every `interval`.
    #[must_use]
    pub const fn new(start: HostTime, interval: Duration) -> Self {
        Self {
            now: start,
            interval,
            frame_index: 0,
        }
    }

    /// Returns the next tick and advances.
    pub fn tick(&mut self) -> FrameTick {
        let tick = FrameTick {
            now: self.now,
            frame_index: self.frame_index,
        };
        self.now = self.now + self.interval;
        self.frame_index += 1;
        tick
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheduler_cancel_only_touches_pending() {
        let mut scheduler = ManualScheduler::new();
        let first = scheduler.request_frame();
        assert!(scheduler.fire(), "first request fires");
        scheduler.cancel_frame(first);
        assert_eq!(scheduler.cancelled(), 0, "fired request is not cancelled");

        let second = scheduler.request_frame();
        scheduler.cancel_frame(second);
        assert_eq!(scheduler.cancelled(), 1, "pending request is cancelled");
        assert_eq!(scheduler.pending(), 0, "nothing left pending");
    }

    #[test]
    fn compile_fault_matches_stage() {
        let log = Rc::new(RefCell::new(DeviceLog::default()));
        let mut device = RecordingDevice::new(log, DeviceFault::Compile(ShaderStage::Fragment));
        let vs = device.create_shader(ShaderStage::Vertex, "").unwrap();
        let fs = device.create_shader(ShaderStage::Fragment, "").unwrap();
        assert!(device.compile_shader(&vs).is_ok(), "vertex compiles");
        assert!(device.compile_shader(&fs).is_err(), "fragment fails");
    }

    #[test]
    fn clock_spacing() {
        let mut clock = FrameClock::new(HostTime(100), Duration(10));
        assert_eq!(clock.tick().now, HostTime(100), "first tick at start");
        let second = clock.tick();
        assert_eq!(
            (second.now, second.frame_index),
            (HostTime(110), 1),
            "second tick"
        );
    }
}
