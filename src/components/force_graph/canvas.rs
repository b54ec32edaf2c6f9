use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

/// The drawing primitives the renderer needs from a 2D surface.
pub trait Canvas {
	fn save(&mut self);
	fn restore(&mut self);
	fn fill_background(&mut self, color: &str, width: f64, height: f64);
	/// Applies `translate(x, y)` then `scale(k, k)`.
	fn transform(&mut self, x: f64, y: f64, k: f64);
	fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: &str);
	fn stroke_circle(&mut self, x: f64, y: f64, radius: f64, color: &str, width: f64);
	fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), color: &str, width: f64);
	fn set_font(&mut self, font: &str);
	/// Width of `text` in the current font.
	fn measure_text(&mut self, text: &str) -> f64;
	fn fill_text(&mut self, text: &str, x: f64, y: f64, color: &str);
	fn round_rect(
		&mut self,
		rect: (f64, f64, f64, f64),
		radius: f64,
		fill: &str,
		stroke: &str,
		stroke_width: f64,
	);
}

impl Canvas for CanvasRenderingContext2d {
	fn save(&mut self) {
		CanvasRenderingContext2d::save(self);
	}

	fn restore(&mut self) {
		CanvasRenderingContext2d::restore(self);
	}

	fn fill_background(&mut self, color: &str, width: f64, height: f64) {
		self.set_fill_style_str(color);
		self.fill_rect(0.0, 0.0, width, height);
	}

	fn transform(&mut self, x: f64, y: f64, k: f64) {
		let _ = self.translate(x, y);
		let _ = self.scale(k, k);
	}

	fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: &str) {
		self.begin_path();
		let _ = self.arc(x, y, radius, 0.0, 2.0 * PI);
		self.set_fill_style_str(color);
		self.fill();
	}

	fn stroke_circle(&mut self, x: f64, y: f64, radius: f64, color: &str, width: f64) {
		self.begin_path();
		let _ = self.arc(x, y, radius, 0.0, 2.0 * PI);
		self.set_stroke_style_str(color);
		self.set_line_width(width);
		self.stroke();
	}

	fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), color: &str, width: f64) {
		self.begin_path();
		self.move_to(from.0, from.1);
		self.line_to(to.0, to.1);
		self.set_stroke_style_str(color);
		self.set_line_width(width);
		self.stroke();
	}

	fn set_font(&mut self, font: &str) {
		CanvasRenderingContext2d::set_font(self, font);
	}

	fn measure_text(&mut self, text: &str) -> f64 {
		CanvasRenderingContext2d::measure_text(self, text)
			.map(|m| m.width())
			.unwrap_or(0.0)
	}

	fn fill_text(&mut self, text: &str, x: f64, y: f64, color: &str) {
		self.set_fill_style_str(color);
		let _ = CanvasRenderingContext2d::fill_text(self, text, x, y);
	}

	fn round_rect(
		&mut self,
		(x, y, w, h): (f64, f64, f64, f64),
		radius: f64,
		fill: &str,
		stroke: &str,
		stroke_width: f64,
	) {
		let r = radius.min(w / 2.0).min(h / 2.0);
		self.begin_path();
		self.move_to(x + r, y);
		let _ = self.arc_to(x + w, y, x + w, y + h, r);
		let _ = self.arc_to(x + w, y + h, x, y + h, r);
		let _ = self.arc_to(x, y + h, x, y, r);
		let _ = self.arc_to(x, y, x + w, y, r);
		self.close_path();
		self.set_fill_style_str(fill);
		self.fill();
		self.set_stroke_style_str(stroke);
		self.set_line_width(stroke_width);
		self.stroke();
	}
}
