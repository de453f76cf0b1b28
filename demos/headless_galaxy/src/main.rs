// Copyright 2026 the Galaxy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Headless frame loop that exercises the controller and the diagnostics
//! pipeline.
//!
//! Mounts a background on the harness doubles, runs 60 synthetic frames at
//! 120 Hz with a pointer sweeping across the surface, resizes halfway
//! through and tears down. Events go to both a
//! [`PrettyPrintSink`](galaxy_debug::pretty::PrettyPrintSink) and a
//! [`RecorderSink`](galaxy_debug::recorder::RecorderSink); the recording is
//! exported as Chrome trace JSON and the final frame is written as a PPM.
//!
//! Usage: `headless_galaxy [glitter|gloss|particles]`

use std::fs::File;
use std::io::BufWriter;

use galaxy_core::config::{RenderConfig, Strategy};
use galaxy_core::controller::Galaxy;
use galaxy_core::error::InitError;
use galaxy_core::time::{Duration, HostTime, Timebase};
use galaxy_core::trace::{
    ContextLostEvent, FrameEvent, FrameSkippedEvent, MountEvent, PointerEvent, ResizeEvent,
    TeardownEvent, TraceSink, Tracer,
};
use galaxy_debug::pretty::PrettyPrintSink;
use galaxy_debug::recorder::RecorderSink;
use galaxy_harness::{FrameClock, ManualScheduler, MockHost};
use kurbo::{Point, Rect, Size};

const FRAME_COUNT: u64 = 60;
/// 120 Hz display in microsecond ticks.
const DISPLAY_INTERVAL: Duration = Duration(8_333);

/// Forwards every event to two sinks.
struct Tee<'a> {
    a: &'a mut dyn TraceSink,
    b: &'a mut dyn TraceSink,
}

impl TraceSink for Tee<'_> {
    fn on_mount(&mut self, e: &MountEvent) {
        self.a.on_mount(e);
        self.b.on_mount(e);
    }

    fn on_init_failed(&mut self, e: &InitError) {
        self.a.on_init_failed(e);
        self.b.on_init_failed(e);
    }

    fn on_frame(&mut self, e: &FrameEvent) {
        self.a.on_frame(e);
        self.b.on_frame(e);
    }

    fn on_frame_skipped(&mut self, e: &FrameSkippedEvent) {
        self.a.on_frame_skipped(e);
        self.b.on_frame_skipped(e);
    }

    fn on_resize(&mut self, e: &ResizeEvent) {
        self.a.on_resize(e);
        self.b.on_resize(e);
    }

    fn on_pointer(&mut self, e: &PointerEvent) {
        self.a.on_pointer(e);
        self.b.on_pointer(e);
    }

    fn on_context_lost(&mut self, e: &ContextLostEvent) {
        self.a.on_context_lost(e);
        self.b.on_context_lost(e);
    }

    fn on_teardown(&mut self, e: &TeardownEvent) {
        self.a.on_teardown(e);
        self.b.on_teardown(e);
    }
}

fn main() {
    let timebase = Timebase::MICROS;
    let config = match std::env::args().nth(1).as_deref() {
        Some("gloss") => RenderConfig::gloss(),
        Some("particles") => RenderConfig::particles(),
        _ => RenderConfig::glitter(),
    };
    let strategy = config.strategy;

    // -- sinks -------------------------------------------------------------
    let mut pretty = PrettyPrintSink::with_writer(std::io::stdout(), timebase)
        .verbose_frames(true);
    let mut recorder = RecorderSink::new();

    // -- mount -------------------------------------------------------------
    let (width, height) = (320.0, 180.0);
    let host = MockHost::new(Size::new(width, height));
    let scheduler = ManualScheduler::new();
    let mut galaxy = Galaxy::new(config.clone(), host.clone(), scheduler.clone(), timebase);
    {
        let mut tee = Tee {
            a: &mut pretty,
            b: &mut recorder,
        };
        if let Err(e) = galaxy.mount(42, &mut Tracer::new(&mut tee)) {
            eprintln!("mount failed: {e}");
            std::process::exit(1);
        }
    }

    // -- simulated loop ----------------------------------------------------
    let mut clock = FrameClock::new(HostTime(1_000_000), DISPLAY_INTERVAL);
    let bounds = Rect::new(0.0, 0.0, width, height);
    for frame in 0..FRAME_COUNT {
        let mut tee = Tee {
            a: &mut pretty,
            b: &mut recorder,
        };
        let mut tracer = Tracer::new(&mut tee);

        let t = frame as f64 / FRAME_COUNT as f64;
        galaxy.pointer_move(Point::new(t * width, height * 0.5), bounds, &mut tracer);
        if frame == FRAME_COUNT / 2 {
            host.set_size(Some(Size::new(width * 2.0, height * 2.0)));
            galaxy.resize(&mut tracer);
        }

        if !scheduler.fire() {
            break;
        }
        galaxy.on_frame(clock.tick(), &mut tracer);
    }

    // -- preview -----------------------------------------------------------
    let elapsed_ms = timebase.ticks_to_millis(DISPLAY_INTERVAL.ticks() * FRAME_COUNT);
    if strategy == Strategy::Procedural {
        let pointer = galaxy.interaction().smoothed_pointer();
        #[expect(
            clippy::cast_possible_truncation,
            reason = "preview math is single precision"
        )]
        let pointer = (
            [pointer.x as f32, pointer.y as f32],
            galaxy.interaction().smoothed_active() as f32,
        );
        let path = "galaxy.ppm";
        let file = File::create(path).expect("failed to create galaxy.ppm");
        let mut writer = BufWriter::new(file);
        galaxy_debug::preview::write_ppm(&config, elapsed_ms, 320, 180, Some(pointer), &mut writer)
            .expect("failed to write preview");
        println!("Wrote {path}");
    }

    // -- teardown ----------------------------------------------------------
    {
        let mut tee = Tee {
            a: &mut pretty,
            b: &mut recorder,
        };
        galaxy.teardown(&mut Tracer::new(&mut tee));
    }
    assert_eq!(host.live_objects(), 0, "teardown released every GPU object");

    // -- export Chrome trace -----------------------------------------------
    let path = "trace.json";
    let file = File::create(path).expect("failed to create trace.json");
    let mut writer = BufWriter::new(file);
    galaxy_debug::chrome::export(recorder.as_bytes(), timebase, &mut writer)
        .expect("failed to write Chrome trace");

    println!(
        "Wrote {path} ({} frames rendered, {} skipped)",
        galaxy.frames_rendered(),
        galaxy.frames_skipped()
    );
}
