// Copyright 2026 the Galaxy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Browser console trace output.

use alloc::format;

use wasm_bindgen::JsValue;
use web_sys::console;

use galaxy_core::error::InitError;
use galaxy_core::trace::{ContextLostEvent, MountEvent, ResizeEvent, TeardownEvent, TraceSink};

/// A [`TraceSink`] that writes lifecycle events to the browser console.
///
/// Mounts, resizes and teardowns go to `console.debug` when `verbose` is
/// set. Initialization failures and context loss always go to
/// `console.error`. Per-frame events are never printed.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleSink {
    verbose: bool,
}

impl ConsoleSink {
    /// Creates a sink; `verbose` enables lifecycle messages.
    #[must_use]
    pub const fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl TraceSink for ConsoleSink {
    fn on_mount(&mut self, e: &MountEvent) {
        if self.verbose {
            console::debug_1(&JsValue::from_str(&format!(
                "[galaxy] mounted {:?} at {}x{} ({} GPU objects)",
                e.strategy, e.width, e.height, e.gpu_resources
            )));
        }
    }

    fn on_init_failed(&mut self, e: &InitError) {
        console::error_1(&JsValue::from_str(&format!("[galaxy] {e}")));
    }

    fn on_context_lost(&mut self, e: &ContextLostEvent) {
        console::error_1(&JsValue::from_str(&format!(
            "[galaxy] WebGL context lost after {} frames; stopped",
            e.frames_rendered
        )));
    }

    fn on_resize(&mut self, e: &ResizeEvent) {
        if self.verbose {
            console::debug_1(&JsValue::from_str(&format!(
                "[galaxy] resized to {}x{}",
                e.width, e.height
            )));
        }
    }

    fn on_teardown(&mut self, e: &TeardownEvent) {
        if self.verbose {
            console::debug_1(&JsValue::from_str(&format!(
                "[galaxy] torn down after {} frames, released {} GPU objects",
                e.frames_rendered, e.gpu_resources_released
            )));
        }
    }
}
