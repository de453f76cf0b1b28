// Copyright 2026 the Galaxy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][format] JSON to the given writer.
//!
//! Lifecycle events carry no timestamp of their own. They are placed at the
//! most recent frame time seen in the recording (zero before the first frame).
//!
//! [format]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use galaxy_core::time::Timebase;
use galaxy_core::trace::PointerKind;

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
///
/// Timestamps are converted to microseconds using the provided [`Timebase`].
pub fn export(bytes: &[u8], timebase: Timebase, writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();
    let mut clock = 0.0;

    for recorded in decode(bytes) {
        match recorded {
            RecordedEvent::Mount(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Mount",
                    "cat": "Lifecycle",
                    "ts": clock,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "strategy": format!("{:?}", e.strategy),
                        "width": e.width,
                        "height": e.height,
                        "gpu_resources": e.gpu_resources,
                    }
                }));
            }
            RecordedEvent::InitFailed(kind) => {
                events.push(json!({
                    "ph": "i",
                    "name": "InitFailed",
                    "cat": "Lifecycle",
                    "ts": clock,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "kind": format!("{kind:?}"),
                    }
                }));
            }
            RecordedEvent::Frame(e) => {
                clock = ticks_to_us(e.now.ticks(), timebase);
                events.push(json!({
                    "ph": "i",
                    "name": "Frame",
                    "cat": "Loop",
                    "ts": clock,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "frame_index": e.frame_index,
                        "elapsed_us": ticks_to_us(e.elapsed.ticks(), timebase),
                    }
                }));
            }
            RecordedEvent::FrameSkipped(e) => {
                clock = ticks_to_us(e.now.ticks(), timebase);
                events.push(json!({
                    "ph": "i",
                    "name": "FrameSkipped",
                    "cat": "Loop",
                    "ts": clock,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "frame_index": e.frame_index,
                    }
                }));
            }
            RecordedEvent::Resize(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Resize",
                    "cat": "Surface",
                    "ts": clock,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "width": e.width,
                        "height": e.height,
                        "aspect": e.aspect,
                    }
                }));
            }
            RecordedEvent::Pointer(e) => {
                let (x, y) = e.position.map_or((0.0, 0.0), |p| (p.x, p.y));
                events.push(json!({
                    "ph": "i",
                    "name": match e.kind {
                        PointerKind::Move => "PointerMove",
                        PointerKind::Leave => "PointerLeave",
                    },
                    "cat": "Input",
                    "ts": clock,
                    "pid": 0,
                    "tid": 1,
                    "s": "t",
                    "args": {
                        "x": x,
                        "y": y,
                    }
                }));
            }
            RecordedEvent::ContextLost(e) => {
                clock = ticks_to_us(e.now.ticks(), timebase);
                events.push(json!({
                    "ph": "i",
                    "name": "ContextLost",
                    "cat": "Lifecycle",
                    "ts": clock,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "frame_index": e.frame_index,
                        "frames_rendered": e.frames_rendered,
                        "gpu_resources_released": e.gpu_resources_released,
                    }
                }));
            }
            RecordedEvent::Teardown(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Teardown",
                    "cat": "Lifecycle",
                    "ts": clock,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "frames_rendered": e.frames_rendered,
                        "frames_skipped": e.frames_skipped,
                        "gpu_resources_released": e.gpu_resources_released,
                    }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn ticks_to_us(ticks: u64, timebase: Timebase) -> f64 {
    timebase.ticks_to_nanos(ticks) as f64 / 1000.0
}
