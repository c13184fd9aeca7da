use glowboids_core::{Demo, Key, MAX_AGENTS};
use glowboids_shared::{AttractorUpdate, FlockSettings, FlockStatus};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Element, HtmlCanvasElement, KeyboardEvent, MouseEvent};

mod glow;
pub use glow::{clip_to_canvas, glow_color, rgba};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

macro_rules! console_log {
    ($($t:tt)*) => (log(&format_args!($($t)*).to_string()))
}

/// Diameter of a rendered agent in pixels.
const POINT_SIZE: f64 = 6.0;
const BACKGROUND: &str = "#05060a";

#[wasm_bindgen]
pub struct GlowBoids {
    demo: Demo,
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
    time: f64,
}

#[wasm_bindgen]
impl GlowBoids {
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str, width: u32, height: u32) -> Result<GlowBoids, JsValue> {
        let window = web_sys::window().ok_or("no global window")?;
        let document = window.document().ok_or("no document")?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or("canvas not found")?
            .dyn_into::<HtmlCanvasElement>()?;

        canvas.set_width(width);
        canvas.set_height(height);

        let context = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into::<CanvasRenderingContext2d>()?;

        let demo = Demo::new(width, height);
        console_log!(
            "Initializing glowboids on {}x{} with {} agents",
            width,
            height,
            demo.flock().len()
        );

        Ok(GlowBoids {
            demo,
            canvas,
            context,
            time: 0.0,
        })
    }

    /// Call once per animation frame with the `requestAnimationFrame` timestamp.
    pub fn frame(&mut self, now_ms: f64) -> Result<(), JsValue> {
        let now = now_ms * 0.001;
        if self.demo.tick(now) {
            self.time = now;
            self.render()?;
        }
        Ok(())
    }

    pub fn set_active(&mut self, active: bool) {
        self.demo.set_active(active);
        console_log!("glowboids {}", if active { "resumed" } else { "paused" });
    }

    pub fn is_active(&self) -> bool {
        self.demo.is_active()
    }

    /// Pointer position in canvas pixels and whether it is over the canvas.
    pub fn update_mouse(&mut self, x: f32, y: f32, present: bool) {
        let update = if present {
            AttractorUpdate::at(x, y)
        } else {
            AttractorUpdate::cleared()
        };
        self.apply_attractor(update);
    }

    /// Pointer update as JSON, e.g. `{"position":[120,80]}` or `{"position":null}`.
    pub fn set_attractor_json(&mut self, json: &str) -> Result<(), JsValue> {
        let update =
            AttractorUpdate::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.apply_attractor(update);
        Ok(())
    }

    pub fn handle_mouse_move(&mut self, event: MouseEvent) {
        let canvas_element: &Element = self.canvas.as_ref();
        let rect = canvas_element.get_bounding_client_rect();
        let x = event.client_x() as f64 - rect.left();
        let y = event.client_y() as f64 - rect.top();
        self.update_mouse(x as f32, y as f32, true);
    }

    pub fn handle_mouse_leave(&mut self) {
        self.update_mouse(0.0, 0.0, false);
    }

    /// Feeds a `KeyboardEvent.code`. Returns whether the demo used the key.
    pub fn handle_key(&mut self, code: &str, pressed: bool) -> bool {
        let Some(key) = Key::from_code(code) else {
            return false;
        };
        let frames = self.demo.frame_count();
        let handled = self.demo.handle_key(key, pressed);
        if handled && key == Key::Z && pressed {
            console_log!("Reset key at frame {}", frames);
        }
        handled
    }

    pub fn handle_keyboard_event(&mut self, event: KeyboardEvent, pressed: bool) -> bool {
        let handled = self.handle_key(&event.code(), pressed);
        if handled {
            event.prevent_default();
        }
        handled
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        self.demo.resize(width, height);
        console_log!("Resized to {}x{}", width, height);
    }

    pub fn reset(&mut self) {
        self.demo.reset();
        console_log!("Flock reset");
    }

    /// Interleaved clip-space `x, y` pairs, ready for a vertex buffer.
    pub fn positions(&self) -> js_sys::Float32Array {
        let mut buffer = [0.0f32; MAX_AGENTS * 2];
        let written = self.demo.write_clip_positions(&mut buffer);
        js_sys::Float32Array::from(&buffer[..written * 2])
    }

    pub fn agent_count(&self) -> usize {
        self.demo.flock().len()
    }

    pub fn status_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.status()).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn settings_json(&self) -> Result<String, JsValue> {
        FlockSettings::from(self.demo.flock().config)
            .to_json()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Replaces the flock tuning; fields missing from `json` take their defaults.
    pub fn set_settings_json(&mut self, json: &str) -> Result<(), JsValue> {
        let settings =
            FlockSettings::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        settings
            .validate()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.demo.flock_mut().config = settings.into();
        console_log!("Applied flock settings");
        Ok(())
    }
}

impl GlowBoids {
    fn apply_attractor(&mut self, update: AttractorUpdate) {
        match update.attractor() {
            Some(target) => self.demo.set_attractor(target.x, target.y, true),
            None => self.demo.set_attractor(0.0, 0.0, false),
        }
    }

    fn status(&self) -> FlockStatus {
        FlockStatus {
            agent_count: self.demo.flock().len(),
            frame: self.demo.frame_count(),
            active: self.demo.is_active(),
            attractor_active: self.demo.attractor().is_some(),
        }
    }

    fn render(&self) -> Result<(), JsValue> {
        let width = self.canvas.width() as f64;
        let height = self.canvas.height() as f64;

        self.context.set_global_composite_operation("source-over")?;
        self.context.set_fill_style_str(BACKGROUND);
        self.context.fill_rect(0.0, 0.0, width, height);

        // additive blending so overlapping halos brighten
        self.context.set_global_composite_operation("lighter")?;
        for clip in self.demo.positions_for_render().iter() {
            let (x, y) = clip_to_canvas(*clip, width, height);
            let color = glow_color(self.time as f32, x as f32, y as f32);
            self.draw_point(x, y, POINT_SIZE, &rgba(color, 0.25))?;
            self.draw_point(x, y, POINT_SIZE * 0.5, &rgba(color, 0.9))?;
        }
        self.context.set_global_composite_operation("source-over")?;

        Ok(())
    }

    fn draw_point(&self, x: f64, y: f64, radius: f64, fill: &str) -> Result<(), JsValue> {
        self.context.begin_path();
        self.context.arc(x, y, radius, 0.0, std::f64::consts::TAU)?;
        self.context.set_fill_style_str(fill);
        self.context.fill();
        Ok(())
    }
}
