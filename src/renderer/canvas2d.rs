//! HTML canvas 2D backend

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::Canvas;

pub struct Canvas2d {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl Canvas2d {
    /// Wrap the canvas element with id `canvas_id`
    pub fn new(canvas_id: &str) -> Option<Self> {
        let document = web_sys::window()?.document()?;
        let canvas: HtmlCanvasElement = document.get_element_by_id(canvas_id)?.dyn_into().ok()?;
        let ctx: CanvasRenderingContext2d = canvas.get_context("2d").ok()??.dyn_into().ok()?;
        Some(Self { canvas, ctx })
    }

    pub fn size(&self) -> (f32, f32) {
        (self.canvas.width() as f32, self.canvas.height() as f32)
    }

    /// World origin sits at the canvas center
    fn to_screen(&self, p: Vec2) -> (f64, f64) {
        let (w, h) = self.size();
        (f64::from(p.x + w * 0.5), f64::from(p.y + h * 0.5))
    }

    fn set_fill(&self, color: u32) {
        self.ctx.set_fill_style_str(&format!("#{color:06x}"));
    }

    fn stroke_arc(&self, (x, y): (f64, f64), radius: f32, from: f64, to: f64, width: f64, color: u32) {
        self.ctx.set_stroke_style_str(&format!("#{color:06x}"));
        self.ctx.set_line_width(width);
        self.ctx.begin_path();
        if self.ctx.arc(x, y, f64::from(radius), from, to).is_ok() {
            self.ctx.stroke();
        }
    }
}

impl Canvas for Canvas2d {
    fn clear(&mut self, color: u32) {
        let (w, h) = self.size();
        self.set_fill(color);
        self.ctx.fill_rect(0.0, 0.0, f64::from(w), f64::from(h));
    }

    fn circle(&mut self, pos: Vec2, radius: f32, color: u32) {
        let (x, y) = self.to_screen(pos);
        self.set_fill(color);
        self.ctx.begin_path();
        if self
            .ctx
            .arc(x, y, f64::from(radius), 0.0, std::f64::consts::TAU)
            .is_ok()
        {
            self.ctx.fill();
        }
    }

    fn bar(&mut self, pos: Vec2, size: Vec2, fill: f32, color: u32) {
        let (x, y) = self.to_screen(pos);
        let (w, h) = (f64::from(size.x), f64::from(size.y));
        self.set_fill(0x1b2735);
        self.ctx.fill_rect(x, y, w, h);
        self.set_fill(color);
        self.ctx.fill_rect(x, y, w * f64::from(fill.clamp(0.0, 1.0)), h);
    }

    fn ring(&mut self, center: Vec2, radius: f32, fill: f32, color: u32) {
        use std::f64::consts::{FRAC_PI_2, TAU};
        let c = self.to_screen(center);
        self.stroke_arc(c, radius, 0.0, TAU, 2.0, super::HUD_TRACK);
        let fill = f64::from(fill.clamp(0.0, 1.0));
        if fill > 0.0 {
            self.stroke_arc(c, radius, -FRAC_PI_2, -FRAC_PI_2 + TAU * fill, 3.0, color);
        }
    }

    fn label(&mut self, pos: Vec2, text: &str, color: u32) {
        let (x, y) = self.to_screen(pos);
        self.set_fill(color);
        self.ctx.set_font("bold 11px monospace");
        let _ = self.ctx.fill_text(text, x, y);
    }
}
