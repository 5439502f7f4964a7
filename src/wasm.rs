//! WebAssembly bindings for the backdrop.
//!
//! [`Backdrop`] mounts the render loop on a full-viewport canvas and drives it
//! with `requestAnimationFrame`. The frame, resize and click closures share the
//! controller through `Rc<RefCell<_>>`.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, Window};

use crate::{
    controller::{FrameScheduler, RenderLoop},
    registry,
    render::CanvasSurface,
    schema::BackdropConfig,
};

/// Initialize WASM module with panic hook and logging.
#[wasm_bindgen(start)]
pub fn init() {
    // Set panic hook for better error messages in browser
    console_error_panic_hook::set_once();

    wasm_logger::init(wasm_logger::Config::default());
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// [`FrameScheduler`] over `requestAnimationFrame`.
struct AnimationFrameScheduler {
    window: Window,
    callback: FrameCallback,
    handle: Option<i32>,
}

impl FrameScheduler for AnimationFrameScheduler {
    fn request_frame(&mut self) {
        let callback = self.callback.borrow();
        let Some(callback) = callback.as_ref() else {
            return;
        };
        match self
            .window
            .request_animation_frame(callback.as_ref().unchecked_ref())
        {
            Ok(handle) => self.handle = Some(handle),
            Err(e) => log::warn!("requestAnimationFrame failed: {e:?}"),
        }
    }

    fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            if let Err(e) = self.window.cancel_animation_frame(handle) {
                log::warn!("cancelAnimationFrame failed: {e:?}");
            }
        }
    }
}

struct Shared {
    looper: RenderLoop<AnimationFrameScheduler>,
    surface: CanvasSurface,
}

impl Shared {
    /// Match the backing store to the viewport and return the new size.
    fn fit_viewport(&mut self, window: &Window) -> (f32, f32) {
        let (width, height) = viewport(window);
        self.surface.set_size(width as u32, height as u32);
        (width, height)
    }
}

fn viewport(window: &Window) -> (f32, f32) {
    let dim = |value: Result<JsValue, JsValue>| {
        value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0).max(0.0) as f32
    };
    (dim(window.inner_width()), dim(window.inner_height()))
}

/// Canvas backdrop handle for the page shell.
#[wasm_bindgen]
pub struct Backdrop {
    window: Window,
    shared: Rc<RefCell<Shared>>,
    frame: FrameCallback,
    on_resize: Option<Closure<dyn FnMut()>>,
    on_click: Option<Closure<dyn FnMut(MouseEvent)>>,
}

#[wasm_bindgen]
impl Backdrop {
    /// Bind to the canvas element with the given id.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str) -> Result<Backdrop, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("No document"))?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("No element with id {canvas_id:?}")))?
            .dyn_into()
            .map_err(|_| JsValue::from_str(&format!("Element {canvas_id:?} is not a canvas")))?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("Canvas has no 2d context"))?
            .dyn_into()
            .map_err(|_| JsValue::from_str("Unexpected 2d context type"))?;

        let frame: FrameCallback = Rc::new(RefCell::new(None));
        let scheduler = AnimationFrameScheduler {
            window: window.clone(),
            callback: Rc::clone(&frame),
            handle: None,
        };
        let shared = Rc::new(RefCell::new(Shared {
            looper: RenderLoop::new(scheduler, BackdropConfig::default()),
            surface: CanvasSurface::new(canvas, ctx),
        }));

        let weak: Weak<RefCell<Shared>> = Rc::downgrade(&shared);
        *frame.borrow_mut() = Some(Closure::new(move || {
            let Some(shared) = weak.upgrade() else {
                return;
            };
            let mut shared = shared.borrow_mut();
            let Shared { looper, surface } = &mut *shared;
            looper.on_frame(surface);
        }));

        Ok(Backdrop {
            window,
            shared,
            frame,
            on_resize: None,
            on_click: None,
        })
    }

    /// Size the canvas to the viewport, start the default animation and
    /// attach the resize and click listeners.
    pub fn mount(&mut self) -> Result<(), JsValue> {
        if self.on_resize.is_some() {
            return Ok(());
        }
        {
            let mut shared = self.shared.borrow_mut();
            let (width, height) = shared.fit_viewport(&self.window);
            shared.looper.mount(width, height);
        }

        let weak = Rc::downgrade(&self.shared);
        let window = self.window.clone();
        let on_resize = Closure::<dyn FnMut()>::new(move || {
            if let Some(shared) = weak.upgrade() {
                let mut shared = shared.borrow_mut();
                let (width, height) = shared.fit_viewport(&window);
                shared.looper.resize(width, height);
            }
        });

        let weak = Rc::downgrade(&self.shared);
        let on_click = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
            if let Some(shared) = weak.upgrade() {
                let mut shared = shared.borrow_mut();
                let rect = shared.surface.canvas().get_bounding_client_rect();
                let origin = (rect.left() as f32, rect.top() as f32);
                shared
                    .looper
                    .click(event.client_x() as f32, event.client_y() as f32, origin);
            }
        });

        self.window
            .add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;
        self.canvas()
            .add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
        self.on_resize = Some(on_resize);
        self.on_click = Some(on_click);
        Ok(())
    }

    /// Stop the loop and detach the listeners.
    pub fn unmount(&mut self) {
        if let Some(on_resize) = self.on_resize.take() {
            if let Err(e) = self
                .window
                .remove_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())
            {
                log::warn!("failed to detach resize listener: {e:?}");
            }
        }
        if let Some(on_click) = self.on_click.take() {
            if let Err(e) = self
                .canvas()
                .remove_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())
            {
                log::warn!("failed to detach click listener: {e:?}");
            }
        }
        self.shared.borrow_mut().looper.unmount();
    }

    #[wasm_bindgen(js_name = togglePlay)]
    pub fn toggle_play(&self) -> bool {
        self.shared.borrow_mut().looper.toggle_play()
    }

    #[wasm_bindgen(js_name = isPlaying)]
    pub fn is_playing(&self) -> bool {
        self.shared.borrow().looper.is_playing()
    }

    /// Switch animations. Returns the id actually selected.
    #[wasm_bindgen(js_name = switchAnimation)]
    pub fn switch_animation(&self, id: &str) -> String {
        self.shared.borrow_mut().looper.switch_to(id).to_string()
    }

    #[wasm_bindgen(js_name = activeAnimation)]
    pub fn active_animation(&self) -> String {
        self.shared.borrow().looper.active_id().to_string()
    }

    /// Registered animations as `[{ id, name }]`.
    pub fn animations(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&registry::summaries()).map_err(JsValue::from)
    }
}

impl Backdrop {
    fn canvas(&self) -> HtmlCanvasElement {
        self.shared.borrow().surface.canvas().clone()
    }
}

impl Drop for Backdrop {
    fn drop(&mut self) {
        self.unmount();
        self.frame.borrow_mut().take();
    }
}
