// Copyright 2026 the Galaxy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mount, frame loop, resize and teardown driven through the test doubles.

use galaxy_core::backend::{Blend, Primitive, UniformValue};
use galaxy_core::config::{RenderConfig, RenderOptions, Strategy};
use galaxy_core::controller::{Galaxy, LifecycleState};
use galaxy_core::error::{InitError, ShaderStage};
use galaxy_core::math::{Mat4, Vec3};
use galaxy_core::renderer::{PointCloudRenderer, ProceduralRenderer, Renderer};
use galaxy_core::time::{Duration, HostTime, Timebase};
use galaxy_core::trace::Tracer;
use galaxy_debug::recorder::{RecordedEvent, RecorderSink, decode};
use galaxy_harness::{Call, DeviceFault, FrameClock, ManualScheduler, MockHost, RecordingDevice};
use kurbo::{Point, Rect, Size};

type TestGalaxy = Galaxy<MockHost, ManualScheduler>;

const FRAME_60HZ: Duration = Duration(16_667);
const FRAME_144HZ: Duration = Duration(6_944);

fn setup(config: RenderConfig, host: MockHost) -> (TestGalaxy, MockHost, ManualScheduler) {
    let scheduler = ManualScheduler::with_calls(host.call_log());
    let galaxy = Galaxy::new(config, host.clone(), scheduler.clone(), Timebase::MICROS);
    (galaxy, host, scheduler)
}

fn mounted(config: RenderConfig) -> (TestGalaxy, MockHost, ManualScheduler) {
    let (mut galaxy, host, scheduler) = setup(config, MockHost::new(Size::new(800.0, 600.0)));
    galaxy
        .mount(7, &mut Tracer::none())
        .expect("mount should succeed");
    (galaxy, host, scheduler)
}

/// Fires the pending callback, if any, and delivers the next tick.
fn pump(galaxy: &mut TestGalaxy, scheduler: &ManualScheduler, clock: &mut FrameClock) -> bool {
    if !scheduler.fire() {
        return false;
    }
    galaxy.on_frame(clock.tick(), &mut Tracer::none());
    true
}

fn point_cloud(galaxy: &TestGalaxy) -> &PointCloudRenderer<RecordingDevice> {
    match galaxy.renderer() {
        Some(Renderer::PointCloud(r)) => r,
        other => panic!("expected point cloud renderer, got {other:?}"),
    }
}

fn procedural(galaxy: &TestGalaxy) -> &ProceduralRenderer<RecordingDevice> {
    match galaxy.renderer() {
        Some(Renderer::Procedural(r)) => r,
        other => panic!("expected procedural renderer, got {other:?}"),
    }
}

fn point_cloud_with_hover(disable_rotation: bool) -> RenderConfig {
    RenderConfig::from_options(&RenderOptions {
        strategy: Some(Strategy::PointCloud),
        move_particles_on_hover: Some(true),
        particle_hover_factor: Some(2.0),
        disable_rotation: Some(disable_rotation),
        ..RenderOptions::default()
    })
}

// ---------------------------------------------------------------------------
// Mount
// ---------------------------------------------------------------------------

#[test]
fn procedural_mount_builds_one_quad() {
    let (galaxy, host, scheduler) = mounted(RenderConfig::glitter());
    assert_eq!(galaxy.state(), LifecycleState::Running, "mounted");
    assert_eq!(
        host.live_objects(),
        4,
        "two shaders, one program, one buffer"
    );
    assert_eq!(scheduler.pending(), 1, "first frame requested");
    assert!(galaxy.has_pending_frame(), "controller holds the request");
    assert_eq!(host.resize_listeners(), 1, "resize listener registered");
    assert_eq!(
        host.pointer_listeners(),
        1,
        "glitter preset listens to the pointer"
    );
    assert_eq!(host.drawing_buffer(), (800, 600), "sized on mount");

    let log = host.device_log();
    assert_eq!(log.viewport, Some((800, 600)), "viewport set on mount");
    assert_eq!(
        log.blend,
        Some(Blend::Additive),
        "transparent field blends additively"
    );
    assert_eq!(
        log.attributes,
        vec![("aPosition".to_string(), 2)],
        "one vec2 attribute"
    );
    assert_eq!(
        host.uniform("uResolution"),
        Some(UniformValue::Vec2([800.0, 600.0])),
        "resolution uploaded on mount"
    );
    assert!(log.draws.is_empty(), "mount does not draw");
    assert!(
        procedural(&galaxy).last_frame().is_none(),
        "no frame drawn yet"
    );
}

#[test]
fn point_cloud_mount_uploads_particles_once() {
    let (galaxy, host, _) = mounted(RenderConfig::particles());
    let log = host.device_log();
    assert_eq!(
        log.buffer_sizes,
        vec![200 * 12, 200 * 16, 200 * 12],
        "position, random, color"
    );
    assert_eq!(
        log.attributes,
        vec![
            ("position".to_string(), 3),
            ("random".to_string(), 4),
            ("color".to_string(), 3),
        ],
        "attribute layout"
    );
    assert_eq!(log.blend, Some(Blend::Alpha), "particles alpha blend");
    assert_eq!(point_cloud(&galaxy).count(), 200, "default particle count");
    assert_eq!(host.pointer_listeners(), 0, "hover is off by default");
}

#[test]
fn mounting_twice_is_rejected() {
    let (mut galaxy, host, _) = mounted(RenderConfig::glitter());
    let err = galaxy.mount(7, &mut Tracer::none()).unwrap_err();
    assert_eq!(err, InitError::AlreadyMounted, "second mount refused");
    assert_eq!(galaxy.state(), LifecycleState::Running, "still running");
    assert_eq!(host.live_objects(), 4, "nothing created twice");
}

#[test]
fn mount_without_resize_events_keeps_running() {
    let host = MockHost::new(Size::new(800.0, 600.0)).without_resize_events();
    let (mut galaxy, host, scheduler) = setup(RenderConfig::gloss(), host);
    galaxy
        .mount(7, &mut Tracer::none())
        .expect("mount should succeed");
    assert_eq!(galaxy.state(), LifecycleState::Running, "mounted");
    assert_eq!(host.resize_listeners(), 0, "no listener registered");

    let mut clock = FrameClock::new(HostTime(0), FRAME_60HZ);
    assert!(pump(&mut galaxy, &scheduler, &mut clock), "frame pending");
    assert!(galaxy.teardown(&mut Tracer::none()), "teardown does work");
    assert_eq!(host.resize_listeners(), 0, "nothing removed twice");
    assert!(
        !host.calls().contains(&Call::UnlistenResize),
        "no listener to remove"
    );
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[test]
fn compile_failure_releases_everything() {
    let host = MockHost::new(Size::new(800.0, 600.0))
        .with_fault(DeviceFault::Compile(ShaderStage::Fragment));
    let (mut galaxy, host, scheduler) = setup(RenderConfig::glitter(), host);

    let err = galaxy.mount(1, &mut Tracer::none()).unwrap_err();
    let InitError::ShaderCompile { stage, .. } = &err else {
        panic!("expected a compile error, got {err:?}");
    };
    assert_eq!(*stage, ShaderStage::Fragment, "fragment stage reported");
    assert_eq!(galaxy.state(), LifecycleState::Failed, "mount failed");
    let log = host.device_log();
    assert_eq!(log.created(), 2, "both shaders created before the failure");
    assert_eq!(log.live_objects(), 0, "and both were deleted");
    assert!(!host.surface_attached(), "surface removed");
    assert_eq!(scheduler.requested(), 0, "no frame requested");
    assert_eq!(host.resize_listeners(), 0, "no listeners registered");
}

#[test]
fn link_failure_releases_program_and_shaders() {
    let host = MockHost::new(Size::new(800.0, 600.0)).with_fault(DeviceFault::Link);
    let (mut galaxy, host, _) = setup(RenderConfig::particles(), host);

    let err = galaxy.mount(1, &mut Tracer::none()).unwrap_err();
    assert!(matches!(err, InitError::ProgramLink { .. }), "got {err:?}");
    assert_eq!(
        host.device_log().created(),
        3,
        "two shaders and the program"
    );
    assert_eq!(host.live_objects(), 0, "everything released");
}

#[test]
fn buffer_failure_is_a_resource_error() {
    let host = MockHost::new(Size::new(800.0, 600.0)).with_fault(DeviceFault::Buffer);
    let (mut galaxy, host, _) = setup(RenderConfig::glitter(), host);

    let err = galaxy.mount(1, &mut Tracer::none()).unwrap_err();
    assert!(
        matches!(err, InitError::ResourceAllocation(_)),
        "got {err:?}"
    );
    assert_eq!(host.live_objects(), 0, "program and shaders released");
}

#[test]
fn missing_context_detaches_the_surface() {
    let host = MockHost::new(Size::new(800.0, 600.0)).without_context();
    let (mut galaxy, host, _) = setup(RenderConfig::glitter(), host);

    let err = galaxy.mount(1, &mut Tracer::none()).unwrap_err();
    assert_eq!(err, InitError::ContextUnavailable, "no context");
    assert_eq!(host.detach_calls(), 1, "surface removed once");
    assert!(!host.surface_attached(), "surface gone");
}

#[test]
fn unmeasurable_container_fails_before_creating_anything() {
    let host = MockHost::new(Size::new(800.0, 600.0));
    host.set_size(None);
    let (mut galaxy, host, _) = setup(RenderConfig::glitter(), host);

    let err = galaxy.mount(1, &mut Tracer::none()).unwrap_err();
    assert_eq!(err, InitError::InvalidSurface, "no size to render at");
    assert_eq!(host.device_log().created(), 0, "no GPU objects");
    assert_eq!(host.detach_calls(), 0, "no surface to remove");
}

#[test]
fn context_loss_stops_the_loop() {
    let (mut galaxy, host, scheduler) = mounted(RenderConfig::gloss());
    let mut clock = FrameClock::new(HostTime(0), FRAME_60HZ);
    assert!(pump(&mut galaxy, &scheduler, &mut clock), "first frame");

    host.lose_context();
    assert!(pump(&mut galaxy, &scheduler, &mut clock), "second tick");
    assert_eq!(galaxy.state(), LifecycleState::Failed, "loss is fatal");
    assert_eq!(host.live_objects(), 0, "resources released");
    assert_eq!(scheduler.pending(), 0, "loop stopped");
    assert!(!galaxy.has_pending_frame(), "nothing left to cancel");
    assert_eq!(host.device_log().draws.len(), 1, "no draw after the loss");
}

// ---------------------------------------------------------------------------
// Frame loop
// ---------------------------------------------------------------------------

#[test]
fn each_executed_frame_draws_once() {
    let (mut galaxy, host, scheduler) = mounted(RenderConfig::gloss());
    let mut clock = FrameClock::new(HostTime(1_000), FRAME_60HZ);
    for _ in 0..5 {
        assert!(pump(&mut galaxy, &scheduler, &mut clock), "frame pending");
    }
    let log = host.device_log();
    assert_eq!(
        log.draws,
        vec![(Primitive::Triangles, 6); 5],
        "one quad per frame"
    );
    assert_eq!(log.clears, 5, "one clear per frame");
    assert_eq!(galaxy.frames_rendered(), 5, "every tick admitted");
    assert_eq!(scheduler.pending(), 1, "always exactly one frame pending");
    assert!(galaxy.has_pending_frame(), "controller holds the request");
}

#[test]
fn frame_limiter_skips_early_ticks() {
    // Glitter caps at 60 Hz; ticks arrive every 8 ms.
    let (mut galaxy, host, scheduler) = mounted(RenderConfig::glitter());
    let mut clock = FrameClock::new(HostTime(0), Duration(8_000));
    for _ in 0..4 {
        assert!(pump(&mut galaxy, &scheduler, &mut clock), "frame pending");
    }
    // 0 runs, 8 and 16 are too soon, 24 runs.
    assert_eq!(galaxy.frames_rendered(), 2, "0 ms and 24 ms");
    assert_eq!(galaxy.frames_skipped(), 2, "8 ms and 16 ms");
    assert_eq!(
        host.device_log().draws.len(),
        2,
        "skipped ticks do not draw"
    );
    assert_eq!(scheduler.pending(), 1, "skipped ticks still reschedule");
}

#[test]
fn time_uniform_follows_elapsed_time() {
    let (mut galaxy, host, scheduler) = mounted(RenderConfig::gloss());
    let mut clock = FrameClock::new(HostTime(5_000_000), Duration(1_000_000));
    pump(&mut galaxy, &scheduler, &mut clock);
    assert_eq!(
        host.uniform("uTime"),
        Some(UniformValue::Float(0.0)),
        "first frame is t=0"
    );
    pump(&mut galaxy, &scheduler, &mut clock);
    // One second at the gloss rate of 0.001 per millisecond.
    assert_eq!(
        host.uniform("uTime"),
        Some(UniformValue::Float(1.0)),
        "one second later"
    );
    let frame = procedural(&galaxy).last_frame().expect("frame drawn");
    assert_eq!(frame.time, 1.0, "renderer keeps the uploaded uniforms");
    assert_eq!(frame.resolution, [800.0, 600.0], "at the mount size");
}

#[test]
fn pointer_smoothing_reaches_the_uniforms() {
    let (mut galaxy, host, scheduler) = mounted(RenderConfig::gloss());
    let mut clock = FrameClock::new(HostTime(0), FRAME_60HZ);
    let bounds = Rect::new(0.0, 0.0, 800.0, 600.0);

    galaxy.pointer_move(Point::new(800.0, 0.0), bounds, &mut Tracer::none());
    assert_eq!(
        galaxy.interaction().target_pointer(),
        Point::new(1.0, 1.0),
        "top-right corner maps to (1, 1)"
    );
    assert_eq!(
        host.device_log().draws.len(),
        0,
        "pointer input never draws"
    );

    let mut prev = 0.5;
    for _ in 0..10 {
        pump(&mut galaxy, &scheduler, &mut clock);
        let Some(UniformValue::Vec2([x, _])) = host.uniform("uMouse") else {
            panic!("uMouse not uploaded");
        };
        assert!(x > prev && x < 1.0, "x={x} moves toward the target");
        prev = x;
    }

    galaxy.pointer_leave(&mut Tracer::none());
    let active_before = galaxy.interaction().smoothed_active();
    pump(&mut galaxy, &scheduler, &mut clock);
    assert!(
        galaxy.interaction().smoothed_active() < active_before,
        "activity fades after leave"
    );
}

#[test]
fn particle_buffers_are_not_reuploaded_per_frame() {
    let (mut galaxy, host, scheduler) = mounted(RenderConfig::particles());
    let sizes = host.device_log().buffer_sizes;
    let mut clock = FrameClock::new(HostTime(0), FRAME_60HZ);
    for _ in 0..30 {
        assert!(pump(&mut galaxy, &scheduler, &mut clock), "frame pending");
    }
    let log = host.device_log();
    assert_eq!(log.draws.len(), 30, "one draw per frame");
    assert_eq!(log.buffers_created, 3, "position, random, color only");
    assert_eq!(log.buffer_sizes, sizes, "no upload after mount");
}

fn spin_after_one_second(interval: Duration, ticks: usize) -> f32 {
    let (mut galaxy, _host, scheduler) = mounted(RenderConfig::particles());
    let mut clock = FrameClock::new(HostTime(0), interval);
    for _ in 0..ticks {
        assert!(pump(&mut galaxy, &scheduler, &mut clock), "frame pending");
    }
    galaxy.interaction().rotation().z
}

#[test]
fn spin_does_not_depend_on_refresh_rate() {
    // The last tick lands at 1000.020 ms and 999.936 ms respectively.
    let at_60hz = spin_after_one_second(FRAME_60HZ, 61);
    let at_144hz = spin_after_one_second(FRAME_144HZ, 145);
    assert!(
        (at_60hz - at_144hz).abs() < 1e-4,
        "z@60Hz={at_60hz} z@144Hz={at_144hz}"
    );
    // 1000 ms at speed 0.1: 100 scaled ms of 0.0006 rad each.
    assert!((at_60hz - 0.06).abs() < 1e-4, "z={at_60hz}");
}

#[test]
fn disabled_rotation_leaves_only_the_hover_offset() {
    let (mut galaxy, _host, scheduler) = mounted(point_cloud_with_hover(true));
    let bounds = Rect::new(0.0, 0.0, 800.0, 600.0);
    galaxy.pointer_move(Point::new(800.0, 150.0), bounds, &mut Tracer::none());
    let mut clock = FrameClock::new(HostTime(0), FRAME_60HZ);
    for _ in 0..8 {
        assert!(pump(&mut galaxy, &scheduler, &mut clock), "frame pending");
    }

    let p = galaxy.interaction().smoothed_pointer();
    #[expect(
        clippy::cast_possible_truncation,
        reason = "matrix math is single precision"
    )]
    let offset = Vec3::new(-(p.x as f32) * 2.0, -(p.y as f32) * 2.0, 0.0);
    assert_eq!(
        point_cloud(&galaxy).model(),
        Mat4::from_translation(offset),
        "translation only"
    );
    assert_eq!(
        galaxy.interaction().rotation(),
        Vec3::ZERO,
        "rotation never advances"
    );
}

#[test]
fn enabled_rotation_turns_the_hover_offset() {
    let (mut galaxy, _host, scheduler) = mounted(point_cloud_with_hover(false));
    let bounds = Rect::new(0.0, 0.0, 800.0, 600.0);
    galaxy.pointer_move(Point::new(800.0, 150.0), bounds, &mut Tracer::none());
    let mut clock = FrameClock::new(HostTime(0), FRAME_60HZ);
    for _ in 0..8 {
        assert!(pump(&mut galaxy, &scheduler, &mut clock), "frame pending");
    }
    assert_ne!(
        galaxy.interaction().rotation(),
        Vec3::ZERO,
        "rotation advances"
    );
}

// ---------------------------------------------------------------------------
// Resize
// ---------------------------------------------------------------------------

#[test]
fn resize_updates_projection_aspect() {
    let (mut galaxy, host, _) = mounted(RenderConfig::particles());
    assert_eq!(
        point_cloud(&galaxy).aspect(),
        800.0 / 600.0,
        "initial aspect"
    );

    host.set_size(Some(Size::new(400.0, 300.0)));
    galaxy.resize(&mut Tracer::none());
    assert_eq!(
        host.drawing_buffer(),
        (400, 300),
        "buffer follows container"
    );
    assert_eq!(
        host.device_log().viewport,
        Some((400, 300)),
        "viewport follows"
    );
    assert_eq!(
        point_cloud(&galaxy).aspect(),
        4.0 / 3.0,
        "width over height"
    );

    let expected = Mat4::perspective(15.0_f32.to_radians(), 4.0 / 3.0, 0.1, 100.0);
    assert_eq!(
        host.uniform("projectionMatrix"),
        Some(UniformValue::Mat4(expected.to_cols_array())),
        "projection uploaded"
    );
}

#[test]
fn resize_uses_device_pixels() {
    let (mut galaxy, host, _) = mounted(RenderConfig::glitter());
    host.set_device_pixel_ratio(2.0);
    galaxy.resize(&mut Tracer::none());
    assert_eq!(galaxy.size(), (1600, 1200), "css size times ratio");
    assert_eq!(
        host.uniform("uResolution"),
        Some(UniformValue::Vec2([1600.0, 1200.0])),
        "resolution in device pixels"
    );
}

// ---------------------------------------------------------------------------
// Teardown
// ---------------------------------------------------------------------------

#[test]
fn teardown_releases_everything() {
    let (mut galaxy, host, scheduler) = mounted(RenderConfig::glitter());
    let mut clock = FrameClock::new(HostTime(0), FRAME_60HZ);
    pump(&mut galaxy, &scheduler, &mut clock);

    assert!(
        galaxy.teardown(&mut Tracer::none()),
        "first teardown does work"
    );
    assert_eq!(galaxy.state(), LifecycleState::TornDown, "torn down");
    assert_eq!(host.live_objects(), 0, "no GPU objects left");
    assert_eq!(host.resize_listeners(), 0, "resize listener removed");
    assert_eq!(host.pointer_listeners(), 0, "pointer listeners removed");
    assert_eq!(scheduler.pending(), 0, "pending frame cancelled");
    assert_eq!(scheduler.cancelled(), 1, "exactly one cancellation");
    assert!(!galaxy.has_pending_frame(), "request dropped");
    assert!(!host.surface_attached(), "surface removed");
}

#[test]
fn teardown_releases_in_order() {
    let (mut galaxy, host, scheduler) = mounted(RenderConfig::glitter());
    let mut clock = FrameClock::new(HostTime(0), FRAME_60HZ);
    assert!(pump(&mut galaxy, &scheduler, &mut clock), "frame pending");
    let before = host.calls().len();

    assert!(
        galaxy.teardown(&mut Tracer::none()),
        "first teardown does work"
    );
    let calls = host.calls().split_off(before);
    assert_eq!(
        calls,
        vec![
            Call::UnlistenResize,
            Call::UnlistenPointer,
            Call::CancelFrame,
            Call::DeleteBuffer,
            Call::DeleteProgram,
            Call::DeleteShader,
            Call::DeleteShader,
            Call::DetachSurface,
        ],
        "listeners, frame, GPU objects, surface"
    );
}

#[test]
fn teardown_is_idempotent() {
    let (mut galaxy, host, scheduler) = mounted(RenderConfig::particles());
    assert!(galaxy.teardown(&mut Tracer::none()), "first call");
    let calls = host.calls().len();
    assert!(
        !galaxy.teardown(&mut Tracer::none()),
        "second call is a no-op"
    );
    assert_eq!(host.calls().len(), calls, "nothing released twice");
    assert_eq!(host.detach_calls(), 1, "surface removed once");
    assert_eq!(scheduler.cancelled(), 1, "frame cancelled once");
    let log = host.device_log();
    assert_eq!(
        log.buffers_deleted, log.buffers_created,
        "each buffer deleted once"
    );
}

#[test]
fn teardown_before_mount_blocks_mounting() {
    let host = MockHost::new(Size::new(10.0, 10.0));
    let (mut galaxy, host, _) = setup(RenderConfig::glitter(), host);
    assert!(
        galaxy.teardown(&mut Tracer::none()),
        "unmounted instance moves to torn down"
    );
    assert_eq!(host.detach_calls(), 0, "nothing to detach");
    assert_eq!(
        galaxy.mount(1, &mut Tracer::none()),
        Err(InitError::AlreadyMounted),
        "a torn-down instance stays down"
    );
}

#[test]
fn ticks_after_teardown_do_nothing() {
    let (mut galaxy, host, scheduler) = mounted(RenderConfig::gloss());
    let mut clock = FrameClock::new(HostTime(0), FRAME_60HZ);
    pump(&mut galaxy, &scheduler, &mut clock);
    galaxy.teardown(&mut Tracer::none());

    let requested = scheduler.requested();
    let bounds = Rect::new(0.0, 0.0, 2.0, 2.0);
    galaxy.on_frame(clock.tick(), &mut Tracer::none());
    galaxy.resize(&mut Tracer::none());
    galaxy.pointer_move(Point::new(1.0, 1.0), bounds, &mut Tracer::none());
    assert_eq!(scheduler.requested(), requested, "nothing scheduled");
    assert_eq!(host.device_log().draws.len(), 1, "no draw after teardown");
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[test]
fn repulsion_precedence_reaches_the_program() {
    let cases = [
        (Some(1.5), Some(true), 0, 1.5),
        (Some(0.0), Some(true), 1, 2.0),
        (None, Some(false), 2, 0.0),
    ];
    for (auto_center, mouse, mode, amount) in cases {
        let config = RenderConfig::from_options(&RenderOptions {
            auto_center_repulsion: auto_center,
            mouse_repulsion: mouse,
            ..RenderOptions::default()
        });
        let (_galaxy, host, _) = mounted(config);
        assert_eq!(
            host.uniform("uRepulsionMode"),
            Some(UniformValue::Int(mode)),
            "mode for {auto_center:?}/{mouse:?}"
        );
        assert_eq!(
            host.uniform("uRepulsionAmount"),
            Some(UniformValue::Float(amount)),
            "amount for {auto_center:?}/{mouse:?}"
        );
    }
}

#[test]
fn hover_option_enables_point_cloud_pointer_listeners() {
    let config = RenderConfig::from_options(&RenderOptions {
        strategy: Some(Strategy::PointCloud),
        move_particles_on_hover: Some(true),
        ..RenderOptions::default()
    });
    let (mut galaxy, host, scheduler) = mounted(config);
    assert_eq!(host.pointer_listeners(), 1, "hover needs pointer input");

    let bounds = Rect::new(0.0, 0.0, 800.0, 600.0);
    galaxy.pointer_move(Point::new(800.0, 300.0), bounds, &mut Tracer::none());
    let mut clock = FrameClock::new(HostTime(0), FRAME_60HZ);
    pump(&mut galaxy, &scheduler, &mut clock);
    let model = point_cloud(&galaxy).model();
    assert!(model.col(3)[0] < 0.0, "cloud moves away from the pointer");
}

// ---------------------------------------------------------------------------
// Tracing
// ---------------------------------------------------------------------------

#[test]
fn trace_records_the_session() {
    let mut sink = RecorderSink::new();
    let host = MockHost::new(Size::new(320.0, 200.0));
    let (mut galaxy, _host, scheduler) = setup(RenderConfig::glitter(), host);
    galaxy.mount(3, &mut Tracer::new(&mut sink)).unwrap();
    let mut clock = FrameClock::new(HostTime(0), FRAME_60HZ);
    scheduler.fire();
    galaxy.on_frame(clock.tick(), &mut Tracer::new(&mut sink));
    galaxy.teardown(&mut Tracer::new(&mut sink));

    let events: Vec<_> = decode(sink.as_bytes()).collect();
    assert_eq!(events.len(), 3, "mount, frame, teardown: {events:?}");
    match &events[0] {
        RecordedEvent::Mount(e) => {
            assert_eq!((e.width, e.height), (320, 200), "mount size");
            assert_eq!(e.gpu_resources, 4, "quad program objects");
        }
        other => panic!("expected Mount, got {other:?}"),
    }
    match &events[2] {
        RecordedEvent::Teardown(e) => {
            assert_eq!(e.frames_rendered, 1, "one frame");
            assert_eq!(e.gpu_resources_released, 4, "every object released");
        }
        other => panic!("expected Teardown, got {other:?}"),
    }
}

#[test]
fn trace_records_context_loss() {
    let mut sink = RecorderSink::new();
    let (mut galaxy, host, scheduler) = mounted(RenderConfig::gloss());
    let mut clock = FrameClock::new(HostTime(0), FRAME_60HZ);
    scheduler.fire();
    galaxy.on_frame(clock.tick(), &mut Tracer::new(&mut sink));
    host.lose_context();
    scheduler.fire();
    galaxy.on_frame(clock.tick(), &mut Tracer::new(&mut sink));

    let events: Vec<_> = decode(sink.as_bytes()).collect();
    assert_eq!(events.len(), 2, "frame, context loss: {events:?}");
    match &events[1] {
        RecordedEvent::ContextLost(e) => {
            assert_eq!(e.frame_index, 1, "second tick");
            assert_eq!(e.now, HostTime(16_667), "at the tick time");
            assert_eq!(e.frames_rendered, 1, "one frame before the loss");
            assert_eq!(e.gpu_resources_released, 4, "every object released");
        }
        other => panic!("expected ContextLost, got {other:?}"),
    }
}
