// Copyright 2026 the Galaxy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DOM side of a mount: canvas, context and listeners.

use alloc::boxed::Box;
use alloc::rc::Weak;

use kurbo::{Point, Rect, Size};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{
    HtmlCanvasElement, HtmlElement, MouseEvent, ResizeObserver, WebGl2RenderingContext,
    WebglLoseContext, Window, console,
};

use galaxy_core::backend::Host;
use galaxy_core::error::InitError;

use crate::webgl::WebGlDevice;
use crate::{Slot, with_mounted};

enum ResizeHook {
    /// Observes the container itself.
    Observer {
        observer: ResizeObserver,
        _callback: Closure<dyn FnMut()>,
    },
    /// Window `resize` events, where `ResizeObserver` is unavailable.
    Window {
        window: Window,
        callback: Closure<dyn FnMut()>,
    },
}

struct PointerHooks {
    on_move: Closure<dyn FnMut(MouseEvent)>,
    on_leave: Closure<dyn FnMut()>,
}

/// A [`Host`] that draws into a canvas appended to a container element.
///
/// Listener callbacks reach the controller through a weak handle to the
/// mount's slot, so they become no-ops once the mount is gone.
pub struct DomHost {
    container: HtmlElement,
    canvas: Option<HtmlCanvasElement>,
    slot: Weak<Slot>,
    resize: Option<ResizeHook>,
    pointer: Option<PointerHooks>,
}

impl DomHost {
    pub(crate) fn new(container: HtmlElement, slot: Weak<Slot>) -> Self {
        Self {
            container,
            canvas: None,
            slot,
            resize: None,
            pointer: None,
        }
    }
}

impl Host for DomHost {
    type Device = WebGlDevice;

    fn create_device(&mut self) -> Result<WebGlDevice, InitError> {
        let document = self
            .container
            .owner_document()
            .ok_or(InitError::InvalidSurface)?;
        let canvas: HtmlCanvasElement = document
            .create_element("canvas")
            .ok()
            .and_then(|e| e.dyn_into().ok())
            .ok_or(InitError::ResourceAllocation("canvas"))?;
        let style = canvas.style();
        let _ = style.set_property("display", "block");
        let _ = style.set_property("width", "100%");
        let _ = style.set_property("height", "100%");

        self.container
            .append_child(&canvas)
            .map_err(|_| InitError::InvalidSurface)?;
        self.canvas = Some(canvas.clone());

        let gl = canvas
            .get_context("webgl2")
            .ok()
            .flatten()
            .and_then(|c| c.dyn_into::<WebGl2RenderingContext>().ok())
            .ok_or(InitError::ContextUnavailable)?;
        Ok(WebGlDevice::new(gl))
    }

    fn surface_size(&self) -> Option<Size> {
        Some(Size::new(
            f64::from(self.container.client_width()),
            f64::from(self.container.client_height()),
        ))
    }

    fn device_pixel_ratio(&self) -> f64 {
        web_sys::window().map_or(1.0, |w| w.device_pixel_ratio())
    }

    fn set_drawing_buffer_size(&mut self, width: u32, height: u32) {
        if let Some(canvas) = &self.canvas {
            canvas.set_width(width);
            canvas.set_height(height);
        }
    }

    fn listen_resize(&mut self) -> bool {
        if self.resize.is_some() {
            return true;
        }
        let slot = Weak::clone(&self.slot);
        let callback = Closure::wrap(Box::new(move || {
            with_mounted(&slot, |galaxy, tracer| galaxy.resize(tracer));
        }) as Box<dyn FnMut()>);

        if let Ok(observer) = ResizeObserver::new(callback.as_ref().unchecked_ref()) {
            observer.observe(&self.container);
            self.resize = Some(ResizeHook::Observer {
                observer,
                _callback: callback,
            });
            return true;
        }

        let Some(window) = web_sys::window() else {
            console::warn_1(&"[galaxy] no resize notifications available".into());
            return false;
        };
        if window
            .add_event_listener_with_callback("resize", callback.as_ref().unchecked_ref())
            .is_err()
        {
            console::warn_1(&"[galaxy] could not listen for window resize".into());
            return false;
        }
        self.resize = Some(ResizeHook::Window { window, callback });
        true
    }

    fn unlisten_resize(&mut self) {
        match self.resize.take() {
            Some(ResizeHook::Observer { observer, .. }) => observer.disconnect(),
            Some(ResizeHook::Window { window, callback }) => {
                let _ = window.remove_event_listener_with_callback(
                    "resize",
                    callback.as_ref().unchecked_ref(),
                );
            }
            None => {}
        }
    }

    fn listen_pointer(&mut self) {
        if self.pointer.is_some() {
            return;
        }
        let slot = Weak::clone(&self.slot);
        let container = self.container.clone();
        let on_move = Closure::wrap(Box::new(move |e: MouseEvent| {
            let r = container.get_bounding_client_rect();
            let bounds = Rect::new(r.left(), r.top(), r.right(), r.bottom());
            let client = Point::new(f64::from(e.client_x()), f64::from(e.client_y()));
            with_mounted(&slot, |galaxy, tracer| {
                galaxy.pointer_move(client, bounds, tracer);
            });
        }) as Box<dyn FnMut(MouseEvent)>);

        let slot = Weak::clone(&self.slot);
        let on_leave = Closure::wrap(Box::new(move || {
            with_mounted(&slot, |galaxy, tracer| galaxy.pointer_leave(tracer));
        }) as Box<dyn FnMut()>);

        let _ = self
            .container
            .add_event_listener_with_callback("mousemove", on_move.as_ref().unchecked_ref());
        let _ = self
            .container
            .add_event_listener_with_callback("mouseleave", on_leave.as_ref().unchecked_ref());
        self.pointer = Some(PointerHooks { on_move, on_leave });
    }

    fn unlisten_pointer(&mut self) {
        if let Some(hooks) = self.pointer.take() {
            let _ = self.container.remove_event_listener_with_callback(
                "mousemove",
                hooks.on_move.as_ref().unchecked_ref(),
            );
            let _ = self.container.remove_event_listener_with_callback(
                "mouseleave",
                hooks.on_leave.as_ref().unchecked_ref(),
            );
        }
    }

    fn detach_surface(&mut self) {
        let Some(canvas) = self.canvas.take() else {
            return;
        };
        // Give the driver memory back now instead of at garbage collection.
        if let Some(ext) = canvas
            .get_context("webgl2")
            .ok()
            .flatten()
            .and_then(|c| c.dyn_into::<WebGl2RenderingContext>().ok())
            .and_then(|gl| gl.get_extension("WEBGL_lose_context").ok().flatten())
        {
            ext.unchecked_into::<WebglLoseContext>().lose_context();
        }
        canvas.remove();
    }
}

impl Drop for DomHost {
    fn drop(&mut self) {
        // Registered closures are freed with the host.
        self.unlisten_resize();
        self.unlisten_pointer();
    }
}

impl core::fmt::Debug for DomHost {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DomHost")
            .field("attached", &self.canvas.is_some())
            .field("listening_resize", &self.resize.is_some())
            .field("listening_pointer", &self.pointer.is_some())
            .finish_non_exhaustive()
    }
}
