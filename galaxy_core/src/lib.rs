// Copyright 2026 the Galaxy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Configuration, math, renderers and frame-loop controller for the Galaxy
//! animated background.
//!
//! Galaxy draws a decorative, pointer-reactive starfield behind a page. Two
//! strategies share one controller:
//!
//! - **Procedural**: one fullscreen quad. Star placement, color, twinkle,
//!   glow and repulsion are computed per pixel from hashed grid cells. No
//!   per-star CPU state exists.
//! - **Point cloud**: particles generated once on the CPU and uploaded to
//!   static buffers. Each frame rewrites only a model matrix and a time
//!   uniform.
//!
//! The crate is `no_std` compatible (with `alloc`) and never talks to a
//! platform API itself; backends implement the traits in [`backend`].
//!
//! # Architecture
//!
//! ```text
//!   RenderOptions ──► RenderConfig::from_options() ──► RenderConfig
//!                                                          │
//!   Host ──create_device()──► GpuDevice                    ▼
//!                                 │             Galaxy::mount() ──► Renderer::build()
//!                                 ▼                        │
//!   FrameScheduler ──► FrameTick ──► Galaxy::on_frame() ───┤
//!                                     │  FrameLimiter      │
//!                                     │  InteractionState  ▼
//!                                     └──────────► Renderer::draw() ──► one draw call
//! ```
//!
//! **[`config`]**: the immutable [`RenderConfig`](config::RenderConfig)
//! snapshot, presets and option merging.
//!
//! **[`controller`]**: [`Galaxy`](controller::Galaxy), the per-mount state
//! machine owning the loop, listeners and GPU objects.
//!
//! **[`renderer`]**: the two strategies and the resource ledger that makes
//! teardown exact.
//!
//! **[`field`]**: CPU evaluation of the procedural fragment program.
//!
//! **[`particles`]**: unit-ball particle synthesis.
//!
//! **[`interaction`]**: pointer smoothing and coordinate spaces.
//!
//! **[`timing`]** and **[`time`]**: frame ticks, the frame limiter and host
//! time.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) and the zero-overhead
//! [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (enabled by default): Uses `std` float math instead of `libm`.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one
//!   branch per call site).

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod backend;
pub mod color;
pub mod config;
pub mod controller;
pub mod error;
pub mod field;
pub mod interaction;
pub mod math;
pub mod particles;
pub mod renderer;
pub mod shaders;
pub mod time;
pub mod timing;
pub mod trace;
