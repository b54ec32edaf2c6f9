pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 10.0;

pub fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

/// Screen = graph * k + (x, y).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self { x: 0.0, y: 0.0, k: 1.0 }
	}
}

#[derive(Clone, Copy, Debug)]
struct Tween<T> {
	from: T,
	to: T,
	start_ms: f64,
	duration_ms: f64,
}

impl<T: Copy> Tween<T> {
	fn progress(&self, now_ms: f64) -> f64 {
		((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0)
	}
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
	a + (b - a) * t
}

/// Pan/zoom state of the canvas with timed transitions.
///
/// A new command of one kind replaces the running transition of that kind,
/// starting from wherever the camera currently is.
#[derive(Clone, Debug)]
pub struct Camera {
	pub transform: ViewTransform,
	width: f64,
	height: f64,
	clock_ms: f64,
	center: Option<Tween<(f64, f64)>>,
	zoom: Option<Tween<f64>>,
}

impl Camera {
	/// Camera with the graph origin in the middle of the viewport.
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			width,
			height,
			clock_ms: 0.0,
			center: None,
			zoom: None,
		}
	}

	/// Keeps the graph point under the viewport centre in place.
	pub fn resize(&mut self, width: f64, height: f64) {
		let (cx, cy) = self.center_point();
		self.width = width;
		self.height = height;
		self.place(cx, cy, self.transform.k);
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Graph point currently under the viewport centre.
	pub fn center_point(&self) -> (f64, f64) {
		self.screen_to_graph(self.width / 2.0, self.height / 2.0)
	}

	pub fn is_animating(&self) -> bool {
		self.center.is_some() || self.zoom.is_some()
	}

	pub fn center_on(&mut self, x: f64, y: f64, duration_ms: f64) {
		if duration_ms <= 0.0 {
			self.center = None;
			self.place(x, y, self.transform.k);
			return;
		}
		self.center = Some(Tween {
			from: self.center_point(),
			to: (x, y),
			start_ms: self.clock_ms,
			duration_ms,
		});
	}

	pub fn zoom_to(&mut self, level: f64, duration_ms: f64) {
		let level = level.clamp(MIN_ZOOM, MAX_ZOOM);
		if duration_ms <= 0.0 {
			self.zoom = None;
			let (cx, cy) = self.center_point();
			self.place(cx, cy, level);
			return;
		}
		self.zoom = Some(Tween {
			from: self.transform.k,
			to: level,
			start_ms: self.clock_ms,
			duration_ms,
		});
	}

	/// Frames the graph-space box `(min_x, min_y, max_x, max_y)` with
	/// `padding_px` screen pixels on each side.
	pub fn fit_bounds(&mut self, bounds: (f64, f64, f64, f64), duration_ms: f64, padding_px: f64) {
		let (min_x, min_y, max_x, max_y) = bounds;
		let (bw, bh) = ((max_x - min_x).max(1.0), (max_y - min_y).max(1.0));
		let (aw, ah) = (
			(self.width - 2.0 * padding_px).max(1.0),
			(self.height - 2.0 * padding_px).max(1.0),
		);
		let k = (aw / bw).min(ah / bh);
		self.center_on((min_x + max_x) / 2.0, (min_y + max_y) / 2.0, duration_ms);
		self.zoom_to(k, duration_ms);
	}

	/// User drag of the background; cancels transitions.
	pub fn pan_to(&mut self, x: f64, y: f64) {
		self.stop();
		self.transform.x = x;
		self.transform.y = y;
	}

	/// Wheel zoom about a screen point; cancels transitions.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
		self.stop();
		let new_k = (self.transform.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = new_k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	pub fn stop(&mut self) {
		self.center = None;
		self.zoom = None;
	}

	/// Advances running transitions by `dt_ms`.
	pub fn advance(&mut self, dt_ms: f64) {
		self.clock_ms += dt_ms;
		if !self.is_animating() {
			return;
		}
		let now = self.clock_ms;
		let (mut cx, mut cy) = self.center_point();
		let mut k = self.transform.k;

		if let Some(tween) = self.center {
			let t = ease_out_cubic(tween.progress(now));
			cx = lerp(tween.from.0, tween.to.0, t);
			cy = lerp(tween.from.1, tween.to.1, t);
			if t >= 1.0 {
				self.center = None;
			}
		}
		if let Some(tween) = self.zoom {
			let t = ease_out_cubic(tween.progress(now));
			k = lerp(tween.from, tween.to, t);
			if t >= 1.0 {
				self.zoom = None;
			}
		}
		self.place(cx, cy, k);
	}

	fn place(&mut self, cx: f64, cy: f64, k: f64) {
		self.transform = ViewTransform {
			x: self.width / 2.0 - cx * k,
			y: self.height / 2.0 - cy * k,
			k,
		};
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn close(a: f64, b: f64) -> bool {
		(a - b).abs() < 1e-9
	}

	#[test]
	fn starts_centered_on_origin() {
		let camera = Camera::new(800.0, 600.0);
		assert_eq!(camera.center_point(), (0.0, 0.0));
		assert_eq!(camera.screen_to_graph(400.0, 300.0), (0.0, 0.0));
	}

	#[test]
	fn center_and_zoom_settle_after_duration() {
		let mut camera = Camera::new(800.0, 600.0);
		camera.center_on(50.0, -30.0, 600.0);
		camera.zoom_to(4.0, 600.0);
		camera.advance(300.0);
		assert!(camera.is_animating());
		camera.advance(300.0);

		assert!(!camera.is_animating());
		let (cx, cy) = camera.center_point();
		assert!(close(cx, 50.0) && close(cy, -30.0));
		assert!(close(camera.transform.k, 4.0));
	}

	#[test]
	fn newest_center_wins() {
		let mut camera = Camera::new(800.0, 600.0);
		camera.center_on(100.0, 100.0, 600.0);
		camera.advance(200.0);
		camera.center_on(-10.0, 5.0, 600.0);
		camera.advance(600.0);
		let (cx, cy) = camera.center_point();
		assert!(close(cx, -10.0) && close(cy, 5.0));
	}

	#[test]
	fn zero_duration_is_immediate() {
		let mut camera = Camera::new(800.0, 600.0);
		camera.center_on(10.0, 20.0, 0.0);
		camera.zoom_to(2.0, 0.0);
		assert!(!camera.is_animating());
		let (cx, cy) = camera.center_point();
		assert!(close(cx, 10.0) && close(cy, 20.0));
		assert!(close(camera.transform.k, 2.0));
	}

	#[test]
	fn fit_frames_bounds_with_padding() {
		let mut camera = Camera::new(800.0, 600.0);
		camera.fit_bounds((-100.0, -50.0, 100.0, 50.0), 0.0, 80.0);
		// (800 - 160) / 200 = 3.2, (600 - 160) / 100 = 4.4
		assert!(close(camera.transform.k, 3.2));
		assert_eq!(camera.center_point(), (0.0, 0.0));
	}

	#[test]
	fn user_input_cancels_transitions() {
		let mut camera = Camera::new(800.0, 600.0);
		camera.zoom_to(5.0, 600.0);
		camera.zoom_at(400.0, 300.0, 1.1);
		assert!(!camera.is_animating());
		assert!(close(camera.transform.k, 1.1));
		assert_eq!(camera.screen_to_graph(400.0, 300.0), (0.0, 0.0));
	}

	#[test]
	fn zoom_is_clamped() {
		let mut camera = Camera::new(800.0, 600.0);
		camera.zoom_to(100.0, 0.0);
		assert!(close(camera.transform.k, MAX_ZOOM));
	}
}
