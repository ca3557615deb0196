use std::collections::HashMap;
use std::f64::consts::TAU;

use glam::Vec2;
use ambient_engine::{Color, Glow, Surface, SurfaceSize};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

/// `Surface` over a Canvas 2D context.
///
/// The backing store is sized to the element's CSS box times the device
/// pixel ratio, and the context transform is scaled so fields draw in CSS
/// pixels. Images are loaded on first use and skipped until decoded.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    size: SurfaceSize,
    images: HashMap<String, HtmlImageElement>,
}

impl CanvasSurface {
    /// Wrap `canvas`. `Ok(None)` when the browser hands out no 2d context.
    pub fn from_canvas(canvas: HtmlCanvasElement) -> Result<Option<Self>, JsValue> {
        let Some(ctx) = canvas.get_context("2d")? else {
            return Ok(None);
        };
        let ctx: CanvasRenderingContext2d = ctx.dyn_into()?;
        let mut surface = Self {
            canvas,
            ctx,
            size: SurfaceSize::ZERO,
            images: HashMap::new(),
        };
        surface.sync_size()?;
        Ok(Some(surface))
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Measure the element and resize the backing store if it changed.
    /// Returns true on change.
    pub fn sync_size(&mut self) -> Result<bool, JsValue> {
        let rect = self.canvas.get_bounding_client_rect();
        let dpr = web_sys::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
        let size = SurfaceSize::new(rect.width() as f32, rect.height() as f32).with_dpr(dpr as f32);
        if size == self.size {
            return Ok(false);
        }

        let (width, height) = size.device_pixels();
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        // Setting width/height resets the context state, transform included.
        self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)?;
        self.size = size;
        Ok(true)
    }

    /// Start loading `key` ahead of the first draw.
    pub fn preload(&mut self, key: &str) -> Result<(), JsValue> {
        if !self.images.contains_key(key) {
            let image = HtmlImageElement::new()?;
            image.set_cross_origin(Some("anonymous"));
            image.set_src(key);
            self.images.insert(key.to_string(), image);
        }
        Ok(())
    }

    fn ready_image(&mut self, key: &str) -> Option<&HtmlImageElement> {
        if let Err(err) = self.preload(key) {
            log::warn!("canvas: cannot load image {}: {:?}", key, err);
            return None;
        }
        self.images
            .get(key)
            .filter(|image| image.complete() && image.natural_width() > 0)
    }

    #[allow(deprecated)]
    fn set_fill(&self, color: Color) {
        self.ctx.set_fill_style(&JsValue::from_str(&color.to_css()));
    }

    #[allow(deprecated)]
    fn set_stroke(&self, color: Color) {
        self.ctx.set_stroke_style(&JsValue::from_str(&color.to_css()));
    }
}

impl Surface for CanvasSurface {
    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn clear(&mut self) {
        self.ctx
            .clear_rect(0.0, 0.0, self.size.width as f64, self.size.height as f64);
    }

    fn fill_rect(&mut self, origin: Vec2, extent: Vec2, color: Color) {
        self.set_fill(color);
        self.ctx
            .fill_rect(origin.x as f64, origin.y as f64, extent.x as f64, extent.y as f64);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        if !(radius > 0.0) {
            return;
        }
        self.set_fill(color);
        self.ctx.begin_path();
        let _ = self.ctx.arc(center.x as f64, center.y as f64, radius as f64, 0.0, TAU);
        self.ctx.fill();
    }

    fn stroke_ellipse(&mut self, center: Vec2, radii: Vec2, line_width: f32, color: Color) {
        if !(radii.x > 0.0) || !(radii.y > 0.0) {
            return;
        }
        self.set_stroke(color);
        self.ctx.set_line_width(line_width as f64);
        self.ctx.begin_path();
        let _ = self.ctx.ellipse(
            center.x as f64,
            center.y as f64,
            radii.x as f64,
            radii.y as f64,
            0.0,
            0.0,
            TAU,
        );
        self.ctx.stroke();
    }

    fn set_glow(&mut self, glow: Option<Glow>) {
        match glow {
            Some(glow) => {
                self.ctx.set_shadow_blur(glow.blur as f64);
                self.ctx.set_shadow_color(&glow.color.to_css());
            }
            None => {
                self.ctx.set_shadow_blur(0.0);
                self.ctx.set_shadow_color("transparent");
            }
        }
    }

    fn draw_image(&mut self, key: &str, center: Vec2, size: f32, rotation_deg: f32, alpha: f32) {
        let ctx = self.ctx.clone();
        let Some(image) = self.ready_image(key) else {
            return;
        };
        let half = size as f64 / 2.0;

        ctx.save();
        let _ = ctx.translate(center.x as f64, center.y as f64);
        let _ = ctx.rotate((rotation_deg as f64).to_radians());
        ctx.set_global_alpha(alpha.clamp(0.0, 1.0) as f64);
        let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(image, -half, -half, size as f64, size as f64);
        ctx.restore();
    }
}
