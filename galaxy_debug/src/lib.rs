// Copyright 2026 the Galaxy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording, pretty-printing, Chrome trace export and still-frame previews
//! for Galaxy diagnostics.
//!
//! This crate provides [`TraceSink`](galaxy_core::trace::TraceSink)
//! implementations for development and post-mortem analysis, plus an
//! offline renderer for the procedural field:
//!
//! - [`pretty::PrettyPrintSink`]: human-readable one-line-per-event output.
//! - [`recorder::RecorderSink`]: compact binary recording with
//!   [`recorder::decode`] for playback.
//! - [`chrome::export`]: writes Chrome Trace Event Format JSON from recorded
//!   bytes.
//! - [`preview::write_ppm`]: renders one procedural frame on the CPU as a
//!   binary PPM image.

pub mod chrome;
pub mod preview;
pub mod pretty;
pub mod recorder;
