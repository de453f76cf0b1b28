// Copyright 2026 the Galaxy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `requestAnimationFrame` tick source.
//!
//! [`RafScheduler`] implements [`FrameScheduler`]: every
//! [`request_frame`](FrameScheduler::request_frame) registers one browser
//! callback. Each callback receives a [`DOMHighResTimeStamp`][mdn]
//! (milliseconds from `performance.now()`), which is converted to
//! microsecond [`HostTime`] ticks and handed to the tick handler as a
//! [`FrameTick`].
//!
//! The scheduler never re-registers on its own; the controller decides
//! whether a successor frame is wanted.
//!
//! [mdn]: https://developer.mozilla.org/en-US/docs/Web/API/DOMHighResTimeStamp

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::{Cell, RefCell};

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

use galaxy_core::backend::{FrameRequest, FrameScheduler};
use galaxy_core::time::HostTime;
use galaxy_core::timing::FrameTick;

// Direct global bindings instead of `web_sys::Window` methods; avoids
// fetching (and unwrapping) the Window/Performance objects on every frame.
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = performance, js_name = "now")]
    pub(crate) fn performance_now() -> f64;

    #[wasm_bindgen(js_name = "requestAnimationFrame")]
    fn request_animation_frame(callback: &JsValue) -> i32;

    #[wasm_bindgen(js_name = "cancelAnimationFrame")]
    fn cancel_animation_frame(id: i32);
}

type RafClosure = Closure<dyn FnMut(f64)>;

/// A [`FrameScheduler`] backed by `requestAnimationFrame`.
pub struct RafScheduler {
    /// The JS closure handed to every `requestAnimationFrame` call. Dropped
    /// with the scheduler.
    closure: RafClosure,
    /// Frame counter shared with the closure (becomes `FrameTick::frame_index`).
    frame_counter: Rc<Cell<u64>>,
    /// The request made and not yet fired or cancelled.
    outstanding: Rc<RefCell<Option<i32>>>,
}

impl RafScheduler {
    /// Creates a scheduler that delivers each fired request to `on_tick`.
    ///
    /// Nothing is registered until the first
    /// [`request_frame`](FrameScheduler::request_frame).
    pub fn new(mut on_tick: impl FnMut(FrameTick) + 'static) -> Self {
        let frame_counter = Rc::new(Cell::new(0));
        let outstanding = Rc::new(RefCell::new(None));

        let counter = Rc::clone(&frame_counter);
        let pending = Rc::clone(&outstanding);
        let closure = Closure::wrap(Box::new(move |timestamp_ms: f64| {
            pending.borrow_mut().take();

            // Convert DOMHighResTimeStamp (ms) to µs ticks.
            #[expect(
                clippy::cast_possible_truncation,
                clippy::cast_sign_loss,
                reason = "rAF timestamp is a small positive f64; µs fits in u64"
            )]
            let now = HostTime((timestamp_ms * 1000.0) as u64);

            let frame_index = counter.get();
            counter.set(frame_index + 1);
            on_tick(FrameTick { now, frame_index });
        }) as Box<dyn FnMut(f64)>);

        Self {
            closure,
            frame_counter,
            outstanding,
        }
    }
}

impl FrameScheduler for RafScheduler {
    fn request_frame(&mut self) -> FrameRequest {
        let id = request_animation_frame(self.closure.as_ref().unchecked_ref());
        *self.outstanding.borrow_mut() = Some(id);
        FrameRequest(u64::from(id.unsigned_abs()))
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        let mut outstanding = self.outstanding.borrow_mut();
        if let Some(id) = *outstanding
            && u64::from(id.unsigned_abs()) == request.0
        {
            cancel_animation_frame(id);
            *outstanding = None;
        }
    }
}

impl Drop for RafScheduler {
    fn drop(&mut self) {
        // A queued callback must not outlive the closure.
        if let Some(id) = self.outstanding.borrow_mut().take() {
            cancel_animation_frame(id);
        }
    }
}

impl core::fmt::Debug for RafScheduler {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RafScheduler")
            .field("frame_counter", &self.frame_counter.get())
            .field("outstanding", &*self.outstanding.borrow())
            .finish_non_exhaustive()
    }
}
