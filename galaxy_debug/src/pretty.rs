// Copyright 2026 the Galaxy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Timestamps
//! are converted to milliseconds using a [`Timebase`].

use std::io::Write;

use galaxy_core::error::InitError;
use galaxy_core::time::{HostTime, Timebase};
use galaxy_core::trace::{
    ContextLostEvent, FrameEvent, FrameSkippedEvent, MountEvent, PointerEvent, PointerKind,
    ResizeEvent, TeardownEvent, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    timebase: Timebase,
    verbose_frames: bool,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("timebase", &self.timebase)
            .field("verbose_frames", &self.verbose_frames)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr(timebase: Timebase) -> Self {
        Self::with_writer(Box::new(std::io::stderr()), timebase)
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    ///
    /// Per-frame lines are off by default; see
    /// [`verbose_frames`](Self::verbose_frames).
    #[must_use]
    pub fn with_writer(writer: W, timebase: Timebase) -> Self {
        Self {
            writer,
            timebase,
            verbose_frames: false,
        }
    }

    /// Also print a line for every executed and skipped frame.
    #[must_use]
    pub fn verbose_frames(mut self, on: bool) -> Self {
        self.verbose_frames = on;
        self
    }

    /// Consumes the sink and returns the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn ms(&self, ticks: u64) -> f64 {
        self.timebase.ticks_to_millis(ticks)
    }

    fn host_ms(&self, t: HostTime) -> f64 {
        self.ms(t.ticks())
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_mount(&mut self, e: &MountEvent) {
        let _ = writeln!(
            self.writer,
            "[mount] strategy={:?} size={}x{} gpu_objects={}",
            e.strategy,
            e.width,
            e.height,
            e.gpu_resources,
        );
    }

    fn on_init_failed(&mut self, e: &InitError) {
        let _ = writeln!(self.writer, "[init:failed] {e}");
    }

    fn on_frame(&mut self, e: &FrameEvent) {
        if !self.verbose_frames {
            return;
        }
        let _ = writeln!(
            self.writer,
            "[frame] index={} now={:.3}ms elapsed={:.3}ms",
            e.frame_index,
            self.host_ms(e.now),
            self.ms(e.elapsed.ticks()),
        );
    }

    fn on_frame_skipped(&mut self, e: &FrameSkippedEvent) {
        if !self.verbose_frames {
            return;
        }
        let _ = writeln!(
            self.writer,
            "[frame:skipped] index={} now={:.3}ms",
            e.frame_index,
            self.host_ms(e.now),
        );
    }

    fn on_resize(&mut self, e: &ResizeEvent) {
        let _ = writeln!(
            self.writer,
            "[resize] {}x{} aspect={:.4}",
            e.width,
            e.height,
            e.aspect,
        );
    }

    fn on_pointer(&mut self, e: &PointerEvent) {
        let _ = match (e.kind, e.position) {
            (PointerKind::Move, Some(p)) => {
                writeln!(self.writer, "[pointer] move x={:.3} y={:.3}", p.x, p.y)
            }
            (PointerKind::Move, None) => writeln!(self.writer, "[pointer] move"),
            (PointerKind::Leave, _) => writeln!(self.writer, "[pointer] leave"),
        };
    }

    fn on_context_lost(&mut self, e: &ContextLostEvent) {
        let _ = writeln!(
            self.writer,
            "[context:lost] index={} now={:.3}ms rendered={} released={}",
            e.frame_index,
            self.host_ms(e.now),
            e.frames_rendered,
            e.gpu_resources_released,
        );
    }

    fn on_teardown(&mut self, e: &TeardownEvent) {
        let _ = writeln!(
            self.writer,
            "[teardown] rendered={} skipped={} released={}",
            e.frames_rendered,
            e.frames_skipped,
            e.gpu_resources_released,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use galaxy_core::config::Strategy;
    use galaxy_core::time::Duration;

    #[test]
    fn pretty_print_mount_and_teardown() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new(), Timebase::MICROS);
        sink.on_mount(&MountEvent {
            strategy: Strategy::PointCloud,
            width: 800,
            height: 600,
            gpu_resources: 6,
        });
        sink.on_teardown(&TeardownEvent {
            frames_rendered: 3,
            frames_skipped: 1,
            gpu_resources_released: 6,
        });
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert!(
            output.contains("[mount] strategy=PointCloud size=800x600"),
            "got: {output}"
        );
        assert!(output.contains("released=6"), "got: {output}");
    }

    #[test]
    fn frames_are_quiet_unless_verbose() {
        let frame = FrameEvent {
            frame_index: 2,
            now: HostTime(33_000),
            elapsed: Duration(16_500),
        };

        let mut quiet = PrettyPrintSink::with_writer(Vec::<u8>::new(), Timebase::MICROS);
        quiet.on_frame(&frame);
        assert!(quiet.into_inner().is_empty(), "frames hidden by default");

        let mut loud =
            PrettyPrintSink::with_writer(Vec::<u8>::new(), Timebase::MICROS).verbose_frames(true);
        loud.on_frame(&frame);
        let output = String::from_utf8(loud.into_inner()).unwrap();
        assert!(output.contains("elapsed=16.500ms"), "got: {output}");
    }

    #[test]
    fn context_loss_is_always_printed() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new(), Timebase::MICROS);
        sink.on_context_lost(&ContextLostEvent {
            frame_index: 4,
            now: HostTime(50_000),
            frames_rendered: 3,
            gpu_resources_released: 4,
        });
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert!(
            output.starts_with("[context:lost] index=4 now=50.000ms"),
            "got: {output}"
        );
    }
}
