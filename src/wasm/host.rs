//! Mounting, frame loop and listener lifetimes.
//!
//! Everything the page hands us (size, scroll, pointer) is captured by passive
//! listeners into plain values and threaded into the controller on the next
//! animation frame. Listener and frame registrations are RAII guards so that
//! dropping the handle tears the whole scene down.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use glam::Vec2;
use js_sys::{Object, Reflect};
use wasm_bindgen::{closure::Closure, prelude::*, JsCast};
use web_sys::{
    window, AddEventListenerOptions, Event, EventTarget, HtmlCanvasElement, MouseEvent, Window,
    WebGl2RenderingContext as GL,
};

use super::render::DotRenderer;
use crate::config::{DotFieldConfig, DotFieldOptions};
use crate::controller::Controller;
use crate::error::{DotFieldError, Result};
use crate::trail::TrailField;
use crate::viewport::{pointer_to_trail_uv, CanvasRect, DeviceProfile, ViewportState};

fn dom_err(err: JsValue) -> DotFieldError {
    DotFieldError::Dom(format!("{err:?}"))
}

fn browser_window() -> Result<Window> {
    window().ok_or_else(|| DotFieldError::Dom("no window".into()))
}

/// Reads options from JS, falling back to defaults on anything unreadable.
pub(crate) fn parse_options(value: JsValue) -> DotFieldOptions {
    if value.is_undefined() || value.is_null() {
        return DotFieldOptions::default();
    }
    serde_wasm_bindgen::from_value(value).unwrap_or_else(|err| {
        log::warn!("ignoring unreadable dot field options: {err}");
        DotFieldOptions::default()
    })
}

/// Samples the canvas's CSS box, which excludes the scrollbar. A canvas with
/// no layout box yet falls back to the window size.
fn sample_viewport(window: &Window, canvas: &HtmlCanvasElement) -> ViewportState {
    let number = |v: std::result::Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    let (width, height) = match (canvas.client_width(), canvas.client_height()) {
        (w, h) if w > 0 && h > 0 => (w as f64, h as f64),
        _ => (number(window.inner_width()), number(window.inner_height())),
    };
    ViewportState::new(width, height, window.device_pixel_ratio(), window.scroll_y().unwrap_or(0.0))
}

fn now_ms(window: &Window) -> f64 {
    window.performance().map(|p| p.now()).unwrap_or(0.0)
}

/// A listener that is removed when dropped.
struct EventListenerGuard {
    target: EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl EventListenerGuard {
    fn passive(target: &EventTarget, kind: &'static str, handler: impl FnMut(Event) + 'static) -> Result<Self> {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        let options = AddEventListenerOptions::new();
        options.set_passive(true);
        target
            .add_event_listener_with_callback_and_add_event_listener_options(
                kind,
                closure.as_ref().unchecked_ref(),
                &options,
            )
            .map_err(dom_err)?;
        Ok(Self {
            target: target.clone(),
            kind,
            closure,
        })
    }
}

impl Drop for EventListenerGuard {
    fn drop(&mut self) {
        self.target
            .remove_event_listener_with_callback(self.kind, self.closure.as_ref().unchecked_ref())
            .ok();
    }
}

/// Self-rescheduling `requestAnimationFrame` loop, cancelled when dropped.
struct FrameLoop {
    pending: Rc<Cell<Option<i32>>>,
    // The closure reschedules itself through this slot; emptying it on drop
    // breaks the reference cycle.
    callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>,
}

impl FrameLoop {
    fn start(mut on_frame: impl FnMut(f64) + 'static) -> Result<Self> {
        let pending: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
        let callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));

        let slot = callback.clone();
        let next_id = pending.clone();
        *callback.borrow_mut() = Some(Closure::wrap(Box::new(move |timestamp: f64| {
            next_id.set(None);
            on_frame(timestamp);

            // schedule next
            if let Some(cb) = slot.borrow().as_ref() {
                match request_frame(cb) {
                    Ok(id) => next_id.set(Some(id)),
                    Err(err) => log::warn!("dot field frame loop stopped: {err}"),
                }
            }
        }) as Box<dyn FnMut(f64)>));

        let id = match callback.borrow().as_ref() {
            Some(cb) => request_frame(cb)?,
            None => return Err(DotFieldError::MissingResource("frame callback")),
        };
        pending.set(Some(id));

        Ok(Self { pending, callback })
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        if let (Some(id), Some(window)) = (self.pending.take(), window()) {
            window.cancel_animation_frame(id).ok();
        }
        self.callback.borrow_mut().take();
    }
}

fn request_frame(cb: &Closure<dyn FnMut(f64)>) -> Result<i32> {
    browser_window()?
        .request_animation_frame(cb.as_ref().unchecked_ref())
        .map_err(dom_err)
}

/// Everything the frame callback mutates. Only the frame callback and the
/// pointer listener touch it, never at the same time.
struct Scene {
    canvas: HtmlCanvasElement,
    controller: Controller,
    trail: TrailField,
    renderer: DotRenderer,
    first_frame_ms: Option<f64>,
}

impl Scene {
    fn frame(&mut self, now_ms: f64, viewport: &ViewportState) {
        let start = *self.first_frame_ms.get_or_insert(now_ms);
        let time = ((now_ms - start) / 1000.0) as f32;

        let (params, dirty) = self.controller.frame(viewport, time);
        if dirty.resolution {
            let (width, height) = (params.resolution.x as u32, params.resolution.y as u32);
            self.canvas.set_width(width);
            self.canvas.set_height(height);
            self.renderer.set_viewport(width, height);
            log::debug!("dot field resized to {width}x{height}");
        }
        self.renderer.apply(&params, dirty);

        self.trail.tick(now_ms);
        if self.trail.rasterize() {
            self.renderer.upload_trail(self.trail.texels());
        }
        self.renderer.draw();
    }

    fn record_pointer(&mut self, client: Vec2, now_ms: f64) {
        let rect = self.canvas.get_bounding_client_rect();
        let rect = CanvasRect {
            left: rect.left(),
            top: rect.top(),
            width: rect.width(),
            height: rect.height(),
        };
        if let Some(uv) = pointer_to_trail_uv(client.x as f64, client.y as f64, &rect) {
            self.trail.record_move(uv, now_ms);
        }
    }

    fn reconfigure(&mut self, config: DotFieldConfig) -> Result<()> {
        if config.trail != *self.trail.config() {
            if config.trail.size != self.renderer.trail_size() {
                self.renderer.allocate_trail(config.trail.size)?;
            }
            self.trail = TrailField::new(config.trail);
        }
        self.controller.set_config(config);
        Ok(())
    }
}

fn style_full_bleed(canvas: &HtmlCanvasElement) -> Result<()> {
    let style = canvas.style();
    for (property, value) in [
        ("position", "fixed"),
        ("inset", "0"),
        ("width", "100%"),
        ("height", "100%"),
        ("display", "block"),
        ("z-index", "-1"),
        ("pointer-events", "none"),
    ] {
        style.set_property(property, value).map_err(dom_err)?;
    }
    Ok(())
}

fn create_context(canvas: &HtmlCanvasElement, profile: &DeviceProfile) -> Result<GL> {
    let attributes = Object::new();
    for (key, value) in [
        ("antialias", JsValue::from_bool(profile.antialias)),
        ("alpha", JsValue::FALSE),
        ("powerPreference", JsValue::from_str("high-performance")),
    ] {
        Reflect::set(&attributes, &JsValue::from_str(key), &value).map_err(dom_err)?;
    }
    canvas
        .get_context_with_context_options("webgl2", &attributes)
        .map_err(|_| DotFieldError::Unsupported)?
        .ok_or(DotFieldError::Unsupported)?
        .dyn_into::<GL>()
        .map_err(|_| DotFieldError::Unsupported)
}

/// A mounted background. Dropping it (or calling `unmount`) stops rendering
/// and removes every listener it registered; unmounting also releases the GL
/// objects.
#[wasm_bindgen]
pub struct DotFieldHandle {
    scene: Option<Rc<RefCell<Scene>>>,
    frame: Option<FrameLoop>,
    listeners: Vec<EventListenerGuard>,
}

impl DotFieldHandle {
    pub(crate) fn mount(canvas: HtmlCanvasElement, config: DotFieldConfig) -> Result<Self> {
        let window = browser_window()?;
        style_full_bleed(&canvas)?;
        let viewport = Rc::new(Cell::new(sample_viewport(&window, &canvas)));
        let profile = DeviceProfile::detect(&viewport.get(), &config);
        log::info!(
            "mounting dot field (constrained: {}, pixel ratio: {})",
            profile.constrained,
            profile.pixel_ratio(&viewport.get())
        );

        let gl = create_context(&canvas, &profile)?;
        let renderer = DotRenderer::new(gl, config.trail.size)?;

        let scene = Rc::new(RefCell::new(Scene {
            canvas: canvas.clone(),
            controller: Controller::new(profile, config),
            trail: TrailField::new(config.trail),
            renderer,
            first_frame_ms: None,
        }));

        let target: &EventTarget = window.as_ref();
        let mut listeners = Vec::with_capacity(3);

        for kind in ["resize", "scroll"] {
            let viewport = viewport.clone();
            let win = window.clone();
            let canvas = canvas.clone();
            listeners.push(EventListenerGuard::passive(target, kind, move |_| {
                viewport.set(sample_viewport(&win, &canvas));
            })?);
        }

        {
            let scene = scene.clone();
            let win = window.clone();
            listeners.push(EventListenerGuard::passive(target, "pointermove", move |event| {
                let Some(event) = event.dyn_ref::<MouseEvent>() else {
                    return;
                };
                let client = Vec2::new(event.client_x() as f32, event.client_y() as f32);
                if let Ok(mut scene) = scene.try_borrow_mut() {
                    scene.record_pointer(client, now_ms(&win));
                }
            })?);
        }

        let frame = {
            let scene = scene.clone();
            FrameLoop::start(move |timestamp| {
                if let Ok(mut scene) = scene.try_borrow_mut() {
                    scene.frame(timestamp, &viewport.get());
                }
            })?
        };

        Ok(Self {
            scene: Some(scene),
            frame: Some(frame),
            listeners,
        })
    }
}

#[wasm_bindgen]
impl DotFieldHandle {
    /// Applies new options from the next frame on. The device profile chosen
    /// at mount is kept. Does nothing once unmounted.
    #[wasm_bindgen(js_name = setOptions)]
    pub fn set_options(&self, options: JsValue) {
        let Some(scene) = self.scene.as_ref() else {
            return;
        };
        let config = parse_options(options).resolve();
        let Ok(mut scene) = scene.try_borrow_mut() else {
            return;
        };
        if let Err(err) = scene.reconfigure(config) {
            log::warn!("dot field reconfiguration failed: {err}");
        }
    }

    #[wasm_bindgen(js_name = isMounted)]
    pub fn is_mounted(&self) -> bool {
        self.scene.is_some()
    }

    /// Stops the frame loop, removes the listeners and drops the scene. The
    /// loop and listeners hold the only other references to it, so the GL
    /// program, vertex array and trail texture are deleted here.
    pub fn unmount(&mut self) {
        self.frame.take();
        self.listeners.clear();
        if self.scene.take().is_some() {
            log::info!("dot field unmounted");
        }
    }
}
