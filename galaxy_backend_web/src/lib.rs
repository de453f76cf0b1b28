// Copyright 2026 the Galaxy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web backend for Galaxy.
//!
//! This crate provides integration with browser APIs:
//!
//! - [`RafScheduler`]: `requestAnimationFrame` tick source
//! - [`DomHost`]: canvas creation, sizing and DOM listeners
//! - [`WebGlDevice`]: the WebGL2 [`GpuDevice`](galaxy_core::backend::GpuDevice)
//! - [`ConsoleSink`]: lifecycle messages on the browser console
//!
//! [`mount`] wires them together around one
//! [`Galaxy`](galaxy_core::controller::Galaxy); `initGalaxy` exposes the same
//! to JavaScript.
//!
//! ```js
//! const teardown = initGalaxy(document.getElementById("bg"), {
//!   hueShift: 200,
//!   variant: "gloss",
//! });
//! // later
//! teardown?.();
//! ```

#![no_std]

extern crate alloc;

mod console;
mod host;
mod options;
mod raf;
mod webgl;

pub use console::ConsoleSink;
pub use host::DomHost;
pub use options::{read_options, wants_debug};
pub use raf::RafScheduler;
pub use webgl::WebGlDevice;

use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use core::cell::RefCell;

use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

use galaxy_core::config::RenderConfig;
use galaxy_core::controller::Galaxy;
use galaxy_core::time::{HostTime, Timebase};
use galaxy_core::trace::Tracer;

/// A Galaxy mounted into the DOM.
pub type WebGalaxy = Galaxy<DomHost, RafScheduler>;

struct Mounted {
    galaxy: WebGalaxy,
    sink: ConsoleSink,
}

/// The single owner of one mount. Listener and frame callbacks hold weak
/// handles to it.
pub(crate) type Slot = RefCell<Option<Mounted>>;

/// Runs `f` on the mounted instance, if it is still alive and not already
/// borrowed further up the stack.
pub(crate) fn with_mounted(slot: &Weak<Slot>, f: impl FnOnce(&mut WebGalaxy, &mut Tracer<'_>)) {
    let Some(slot) = slot.upgrade() else {
        return;
    };
    let Ok(mut guard) = slot.try_borrow_mut() else {
        return;
    };
    if let Some(Mounted { galaxy, sink }) = guard.as_mut() {
        f(galaxy, &mut Tracer::new(sink));
    }
}

/// Handle returned by [`mount`]; stops and releases the background.
#[derive(Debug)]
pub struct Teardown {
    slot: Rc<Slot>,
}

impl Teardown {
    /// Tears the mount down. Only the first call does anything; returns
    /// whether this one did.
    pub fn run(&self) -> bool {
        let Ok(mut guard) = self.slot.try_borrow_mut() else {
            return false;
        };
        let Some(mut mounted) = guard.take() else {
            return false;
        };
        drop(guard);
        let Mounted { galaxy, sink } = &mut mounted;
        galaxy.teardown(&mut Tracer::new(sink))
    }
}

impl core::fmt::Debug for Mounted {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Mounted")
            .field("galaxy", &self.galaxy)
            .finish_non_exhaustive()
    }
}

/// Mounts a background into `container`.
///
/// Returns `None` if initialization failed; the failure has been logged to
/// the console and nothing is left in the container.
pub fn mount(container: HtmlElement, config: RenderConfig, verbose: bool) -> Option<Teardown> {
    let slot: Rc<Slot> = Rc::new(RefCell::new(None));

    let host = DomHost::new(container, Rc::downgrade(&slot));
    let tick_slot = Rc::downgrade(&slot);
    let scheduler = RafScheduler::new(move |tick| {
        with_mounted(&tick_slot, |galaxy, tracer| galaxy.on_frame(tick, tracer));
    });

    let mut galaxy = Galaxy::new(config, host, scheduler, timebase());
    let mut sink = ConsoleSink::new(verbose);
    let seed = js_sys::Math::random().to_bits();
    galaxy.mount(seed, &mut Tracer::new(&mut sink)).ok()?;

    *slot.borrow_mut() = Some(Mounted { galaxy, sink });
    Some(Teardown { slot })
}

/// JavaScript entry point: `initGalaxy(container, options)`.
///
/// Returns a teardown function, or `null` if the background could not be
/// created. Calling the teardown function more than once is harmless.
#[wasm_bindgen(js_name = "initGalaxy")]
pub fn init_galaxy(container: HtmlElement, options: JsValue) -> JsValue {
    let config = RenderConfig::from_options(&read_options(&options));
    match mount(container, config, wants_debug(&options)) {
        Some(teardown) => Closure::wrap(Box::new(move || {
            teardown.run();
        }) as Box<dyn FnMut()>)
        .into_js_value(),
        None => JsValue::NULL,
    }
}

/// Returns the current host time from `performance.now()`.
///
/// The returned [`HostTime`] is in microsecond ticks. Use [`timebase`] to
/// convert to nanoseconds.
#[must_use]
pub fn now() -> HostTime {
    let ms = raf::performance_now();
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "performance.now() returns small positive f64; µs fits in u64"
    )]
    let us = (ms * 1000.0) as u64;
    HostTime(us)
}

/// Returns the web [`Timebase`]: 1 tick = 1 µs = 1000 ns.
#[must_use]
pub fn timebase() -> Timebase {
    Timebase::MICROS
}
