// Copyright 2026 the Galaxy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as little-endian records. [`decode`] reads them back as an
//! iterator of [`RecordedEvent`].
//!
//! Initialization failures store only the error kind; driver logs are not
//! recorded.

use galaxy_core::config::Strategy;
use galaxy_core::error::InitError;
use galaxy_core::time::{Duration, HostTime};
use galaxy_core::trace::{
    ContextLostEvent, FrameEvent, FrameSkippedEvent, MountEvent, PointerEvent, PointerKind,
    ResizeEvent, TeardownEvent, TraceSink,
};
use kurbo::Point;

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_MOUNT: u8 = 1;
const TAG_INIT_FAILED: u8 = 2;
const TAG_FRAME: u8 = 3;
const TAG_FRAME_SKIPPED: u8 = 4;
const TAG_RESIZE: u8 = 5;
const TAG_POINTER: u8 = 6;
const TAG_TEARDOWN: u8 = 7;
const TAG_CONTEXT_LOST: u8 = 8;

/// Kind of an initialization failure, without its diagnostic text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InitFailureKind {
    /// [`InitError::ContextUnavailable`].
    ContextUnavailable,
    /// [`InitError::InvalidSurface`].
    InvalidSurface,
    /// [`InitError::ShaderCompile`].
    ShaderCompile,
    /// [`InitError::ProgramLink`].
    ProgramLink,
    /// [`InitError::ResourceAllocation`].
    ResourceAllocation,
    /// [`InitError::AlreadyMounted`].
    AlreadyMounted,
}

impl InitFailureKind {
    fn code(self) -> u8 {
        match self {
            Self::ContextUnavailable => 0,
            Self::InvalidSurface => 1,
            Self::ShaderCompile => 2,
            Self::ProgramLink => 3,
            Self::ResourceAllocation => 4,
            Self::AlreadyMounted => 5,
        }
    }

    fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            0 => Self::ContextUnavailable,
            1 => Self::InvalidSurface,
            2 => Self::ShaderCompile,
            3 => Self::ProgramLink,
            4 => Self::ResourceAllocation,
            5 => Self::AlreadyMounted,
            _ => return None,
        })
    }
}

impl From<&InitError> for InitFailureKind {
    fn from(e: &InitError) -> Self {
        match e {
            InitError::ContextUnavailable => Self::ContextUnavailable,
            InitError::InvalidSurface => Self::InvalidSurface,
            InitError::ShaderCompile { .. } => Self::ShaderCompile,
            InitError::ProgramLink { .. } => Self::ProgramLink,
            InitError::ResourceAllocation(_) => Self::ResourceAllocation,
            InitError::AlreadyMounted => Self::AlreadyMounted,
        }
    }
}

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_f32(&mut self, v: f32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_usize(&mut self, v: usize) {
        self.write_u64(u64::try_from(v).unwrap_or(u64::MAX));
    }
}

impl TraceSink for RecorderSink {
    fn on_mount(&mut self, e: &MountEvent) {
        self.write_u8(TAG_MOUNT);
        self.write_u8(match e.strategy {
            Strategy::Procedural => 0,
            Strategy::PointCloud => 1,
        });
        self.write_u32(e.width);
        self.write_u32(e.height);
        self.write_usize(e.gpu_resources);
    }

    fn on_init_failed(&mut self, e: &InitError) {
        self.write_u8(TAG_INIT_FAILED);
        self.write_u8(InitFailureKind::from(e).code());
    }

    fn on_frame(&mut self, e: &FrameEvent) {
        self.write_u8(TAG_FRAME);
        self.write_u64(e.frame_index);
        self.write_u64(e.now.ticks());
        self.write_u64(e.elapsed.ticks());
    }

    fn on_frame_skipped(&mut self, e: &FrameSkippedEvent) {
        self.write_u8(TAG_FRAME_SKIPPED);
        self.write_u64(e.frame_index);
        self.write_u64(e.now.ticks());
    }

    fn on_resize(&mut self, e: &ResizeEvent) {
        self.write_u8(TAG_RESIZE);
        self.write_u32(e.width);
        self.write_u32(e.height);
        self.write_f32(e.aspect);
    }

    fn on_pointer(&mut self, e: &PointerEvent) {
        self.write_u8(TAG_POINTER);
        match (e.kind, e.position) {
            (PointerKind::Move, Some(p)) => {
                self.write_u8(1);
                self.write_f64(p.x);
                self.write_f64(p.y);
            }
            (PointerKind::Move, None) => {
                self.write_u8(2);
                self.write_f64(0.0);
                self.write_f64(0.0);
            }
            (PointerKind::Leave, _) => {
                self.write_u8(0);
                self.write_f64(0.0);
                self.write_f64(0.0);
            }
        }
    }

    fn on_context_lost(&mut self, e: &ContextLostEvent) {
        self.write_u8(TAG_CONTEXT_LOST);
        self.write_u64(e.frame_index);
        self.write_u64(e.now.ticks());
        self.write_u64(e.frames_rendered);
        self.write_usize(e.gpu_resources_released);
    }

    fn on_teardown(&mut self, e: &TeardownEvent) {
        self.write_u8(TAG_TEARDOWN);
        self.write_u64(e.frames_rendered);
        self.write_u64(e.frames_skipped);
        self.write_usize(e.gpu_resources_released);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug)]
pub enum RecordedEvent {
    /// A [`MountEvent`].
    Mount(MountEvent),
    /// An initialization failure.
    InitFailed(InitFailureKind),
    /// A [`FrameEvent`].
    Frame(FrameEvent),
    /// A [`FrameSkippedEvent`].
    FrameSkipped(FrameSkippedEvent),
    /// A [`ResizeEvent`].
    Resize(ResizeEvent),
    /// A [`PointerEvent`].
    Pointer(PointerEvent),
    /// A [`ContextLostEvent`].
    ContextLost(ContextLostEvent),
    /// A [`TeardownEvent`].
    Teardown(TeardownEvent),
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        let bytes = self.data.get(self.pos..self.pos + N)?.try_into().ok()?;
        self.pos += N;
        Some(bytes)
    }

    fn read_u8(&mut self) -> Option<u8> {
        self.take::<1>().map(|[b]| b)
    }

    fn read_u32(&mut self) -> Option<u32> {
        self.take().map(u32::from_le_bytes)
    }

    fn read_u64(&mut self) -> Option<u64> {
        self.take().map(u64::from_le_bytes)
    }

    fn read_f32(&mut self) -> Option<f32> {
        self.take().map(f32::from_le_bytes)
    }

    fn read_f64(&mut self) -> Option<f64> {
        self.take().map(f64::from_le_bytes)
    }

    fn read_usize(&mut self) -> Option<usize> {
        Some(usize::try_from(self.read_u64()?).unwrap_or(usize::MAX))
    }

    fn decode_mount(&mut self) -> Option<RecordedEvent> {
        let strategy = match self.read_u8()? {
            0 => Strategy::Procedural,
            _ => Strategy::PointCloud,
        };
        Some(RecordedEvent::Mount(MountEvent {
            strategy,
            width: self.read_u32()?,
            height: self.read_u32()?,
            gpu_resources: self.read_usize()?,
        }))
    }

    fn decode_pointer(&mut self) -> Option<RecordedEvent> {
        let kind = self.read_u8()?;
        let (x, y) = (self.read_f64()?, self.read_f64()?);
        Some(RecordedEvent::Pointer(match kind {
            0 => PointerEvent {
                kind: PointerKind::Leave,
                position: None,
            },
            1 => PointerEvent {
                kind: PointerKind::Move,
                position: Some(Point::new(x, y)),
            },
            _ => PointerEvent {
                kind: PointerKind::Move,
                position: None,
            },
        }))
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        match self.read_u8()? {
            TAG_MOUNT => self.decode_mount(),
            TAG_INIT_FAILED => {
                InitFailureKind::from_code(self.read_u8()?).map(RecordedEvent::InitFailed)
            }
            TAG_FRAME => Some(RecordedEvent::Frame(FrameEvent {
                frame_index: self.read_u64()?,
                now: HostTime(self.read_u64()?),
                elapsed: Duration(self.read_u64()?),
            })),
            TAG_FRAME_SKIPPED => Some(RecordedEvent::FrameSkipped(FrameSkippedEvent {
                frame_index: self.read_u64()?,
                now: HostTime(self.read_u64()?),
            })),
            TAG_RESIZE => Some(RecordedEvent::Resize(ResizeEvent {
                width: self.read_u32()?,
                height: self.read_u32()?,
                aspect: self.read_f32()?,
            })),
            TAG_POINTER => self.decode_pointer(),
            TAG_TEARDOWN => Some(RecordedEvent::Teardown(TeardownEvent {
                frames_rendered: self.read_u64()?,
                frames_skipped: self.read_u64()?,
                gpu_resources_released: self.read_usize()?,
            })),
            TAG_CONTEXT_LOST => Some(RecordedEvent::ContextLost(ContextLostEvent {
                frame_index: self.read_u64()?,
                now: HostTime(self.read_u64()?),
                frames_rendered: self.read_u64()?,
                gpu_resources_released: self.read_usize()?,
            })),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use galaxy_core::error::ShaderStage;

    #[test]
    fn records_a_mount_session() {
        let mut rec = RecorderSink::new();
        rec.on_mount(&MountEvent {
            strategy: Strategy::Procedural,
            width: 800,
            height: 600,
            gpu_resources: 4,
        });
        rec.on_frame(&FrameEvent {
            frame_index: 0,
            now: HostTime(1_000),
            elapsed: Duration::ZERO,
        });
        rec.on_pointer(&PointerEvent {
            kind: PointerKind::Move,
            position: Some(Point::new(0.25, 0.75)),
        });
        rec.on_resize(&ResizeEvent {
            width: 400,
            height: 300,
            aspect: 4.0 / 3.0,
        });
        rec.on_teardown(&TeardownEvent {
            frames_rendered: 1,
            frames_skipped: 0,
            gpu_resources_released: 4,
        });

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events.len(), 5, "all five events decode");
        match &events[0] {
            RecordedEvent::Mount(e) => {
                assert_eq!(e.strategy, Strategy::Procedural);
                assert_eq!((e.width, e.height, e.gpu_resources), (800, 600, 4));
            }
            other => panic!("expected Mount, got {other:?}"),
        }
        match &events[2] {
            RecordedEvent::Pointer(e) => {
                assert_eq!(e.kind, PointerKind::Move);
                assert_eq!(e.position, Some(Point::new(0.25, 0.75)));
            }
            other => panic!("expected Pointer, got {other:?}"),
        }
        match &events[3] {
            RecordedEvent::Resize(e) => assert_eq!(e.aspect, 4.0 / 3.0),
            other => panic!("expected Resize, got {other:?}"),
        }
    }

    #[test]
    fn init_failure_keeps_only_the_kind() {
        let mut rec = RecorderSink::new();
        rec.on_init_failed(&InitError::ShaderCompile {
            stage: ShaderStage::Vertex,
            log: "0:1: syntax error".into(),
        });
        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert!(
            matches!(
                events[..],
                [RecordedEvent::InitFailed(InitFailureKind::ShaderCompile)]
            ),
            "got {events:?}"
        );
    }

    #[test]
    fn context_loss_decodes() {
        let mut rec = RecorderSink::new();
        rec.on_context_lost(&ContextLostEvent {
            frame_index: 12,
            now: HostTime(200_000),
            frames_rendered: 11,
            gpu_resources_released: 6,
        });
        match decode(rec.as_bytes()).next() {
            Some(RecordedEvent::ContextLost(e)) => {
                assert_eq!(e.frame_index, 12, "frame index");
                assert_eq!(e.now, HostTime(200_000), "tick time");
                assert_eq!(e.gpu_resources_released, 6, "released count");
            }
            other => panic!("expected ContextLost, got {other:?}"),
        }
    }

    #[test]
    fn truncated_recording_stops_cleanly() {
        let mut rec = RecorderSink::new();
        rec.on_frame_skipped(&FrameSkippedEvent {
            frame_index: 9,
            now: HostTime(5),
        });
        let bytes = rec.into_bytes();
        assert_eq!(
            decode(&bytes[..bytes.len() - 1]).count(),
            0,
            "partial record is dropped"
        );
    }
}
