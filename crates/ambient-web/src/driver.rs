use std::cell::RefCell;
use std::rc::Rc;

use ambient_engine::{AnyField, Field, FieldEvent, FieldPreset, FieldRunner, FrameOutcome, Surface, Theme};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{HtmlCanvasElement, MediaQueryList, MediaQueryListEvent, Window};

use crate::canvas::CanvasSurface;

const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Everything the frame callback and the listeners share.
struct LoopState {
    runner: FieldRunner<AnyField>,
    surface: CanvasSurface,
    raf_id: Option<i32>,
    opacity: Option<f32>,
}

impl LoopState {
    fn step(&mut self, now: f64) -> FrameOutcome {
        self.raf_id = None;
        if let Err(err) = self.surface.sync_size() {
            log::warn!("canvas driver: cannot resize surface: {:?}", err);
        }
        let outcome = self.runner.frame(now, &mut self.surface);
        if outcome != FrameOutcome::Stopped {
            self.sync_opacity();
        }
        outcome
    }

    /// Mirror the field's layer opacity onto the canvas element style.
    fn sync_opacity(&mut self) {
        let opacity = self.runner.field().layer_opacity(self.runner.context());
        if self.opacity == Some(opacity) {
            return;
        }
        match self.surface.canvas().style().set_property("opacity", &opacity.to_string()) {
            Ok(()) => self.opacity = Some(opacity),
            Err(err) => log::warn!("canvas driver: cannot set opacity: {:?}", err),
        }
    }
}

/// Drives a field on a canvas with `requestAnimationFrame`.
///
/// Owns the frame loop and the window listeners. Dropping the driver (or
/// calling `teardown`) cancels the pending frame, removes the listeners and
/// releases the field's batch.
pub struct CanvasDriver {
    window: Window,
    state: Rc<RefCell<LoopState>>,
    frame: FrameCallback,
    on_resize: Option<Closure<dyn FnMut()>>,
    on_motion: Option<Closure<dyn FnMut(MediaQueryListEvent)>>,
    motion_query: Option<MediaQueryList>,
}

impl CanvasDriver {
    /// Mount `preset` on `canvas` and start the loop.
    ///
    /// `Ok(None)` when the canvas has no 2d context; nothing is started.
    pub fn mount(canvas: HtmlCanvasElement, preset: FieldPreset, theme: Theme) -> Result<Option<Self>, JsValue> {
        let window = web_sys::window().ok_or("no global window")?;
        let Some(surface) = CanvasSurface::from_canvas(canvas)? else {
            log::debug!("canvas driver: no 2d context, loop not started");
            return Ok(None);
        };

        let motion_query = window.match_media(REDUCED_MOTION_QUERY)?;
        let reduced = motion_query.as_ref().map(|q| q.matches()).unwrap_or(false);

        let field = preset.build();
        let kind = field.kind();
        let mut runner = FieldRunner::new(field).with_environment(theme, reduced);
        if !runner.mount(Some(&surface as &dyn Surface)) {
            return Ok(None);
        }
        log::info!("canvas driver: {} mounted (reduced motion: {})", kind, reduced);

        let state = Rc::new(RefCell::new(LoopState {
            runner,
            surface,
            raf_id: None,
            opacity: None,
        }));
        let frame: FrameCallback = Rc::new(RefCell::new(None));

        // The callback re-requests itself through `frame`, so it holds a
        // clone of the cell it lives in. `teardown` empties the cell.
        {
            let state = state.clone();
            let window = window.clone();
            let frame_self = frame.clone();
            *frame.borrow_mut() = Some(Closure::wrap(Box::new(move |now: f64| {
                let outcome = state.borrow_mut().step(now);
                if outcome.wants_next_frame() {
                    schedule(&window, &frame_self, &state);
                }
            }) as Box<dyn FnMut(f64)>));
        }

        let on_resize = {
            let state = state.clone();
            let window = window.clone();
            let frame = frame.clone();
            Closure::wrap(Box::new(move || {
                let woken = {
                    let mut loop_state = state.borrow_mut();
                    if let Err(err) = loop_state.surface.sync_size() {
                        log::warn!("canvas driver: cannot resize surface: {:?}", err);
                    }
                    let size = loop_state.surface.size();
                    loop_state.runner.push_event(FieldEvent::Resize(size))
                };
                if woken {
                    schedule(&window, &frame, &state);
                }
            }) as Box<dyn FnMut()>)
        };
        window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;

        let on_motion = match &motion_query {
            Some(query) => {
                let state = state.clone();
                let window = window.clone();
                let frame = frame.clone();
                let closure = Closure::wrap(Box::new(move |event: MediaQueryListEvent| {
                    let woken = state
                        .borrow_mut()
                        .runner
                        .push_event(FieldEvent::ReducedMotion(event.matches()));
                    if woken {
                        schedule(&window, &frame, &state);
                    }
                }) as Box<dyn FnMut(MediaQueryListEvent)>);
                query.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref())?;
                Some(closure)
            }
            None => None,
        };

        let driver = Self {
            window,
            state,
            frame,
            on_resize: Some(on_resize),
            on_motion,
            motion_query,
        };
        schedule(&driver.window, &driver.frame, &driver.state);
        Ok(Some(driver))
    }

    /// Switch theme; wakes a parked loop so the new colors are painted.
    pub fn set_theme(&self, theme: Theme) {
        let woken = self.state.borrow_mut().runner.push_event(FieldEvent::Theme(theme));
        if woken {
            schedule(&self.window, &self.frame, &self.state);
        }
    }

    pub fn is_live(&self) -> bool {
        self.state.borrow().runner.is_live()
    }

    /// Stop the loop now. Safe to call more than once.
    pub fn teardown(&mut self) {
        {
            let mut loop_state = self.state.borrow_mut();
            if let Some(id) = loop_state.raf_id.take() {
                if let Err(err) = self.window.cancel_animation_frame(id) {
                    log::warn!("canvas driver: cannot cancel frame: {:?}", err);
                }
            }
            loop_state.runner.teardown();
        }

        if let Some(on_resize) = self.on_resize.take() {
            let _ = self
                .window
                .remove_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref());
        }
        if let (Some(query), Some(on_motion)) = (self.motion_query.take(), self.on_motion.take()) {
            let _ = query.remove_event_listener_with_callback("change", on_motion.as_ref().unchecked_ref());
        }
        self.frame.borrow_mut().take();
    }
}

impl Drop for CanvasDriver {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Request the next display frame unless one is already pending or the
/// loop was torn down.
fn schedule(window: &Window, frame: &FrameCallback, state: &Rc<RefCell<LoopState>>) {
    let mut loop_state = state.borrow_mut();
    if loop_state.raf_id.is_some() || !loop_state.runner.is_live() {
        return;
    }
    let callback = frame.borrow();
    let Some(closure) = callback.as_ref() else {
        return;
    };
    match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
        Ok(id) => loop_state.raf_id = Some(id),
        Err(err) => log::warn!("canvas driver: requestAnimationFrame failed: {:?}", err),
    }
}
