use log::debug;

pub const FOCUS_DURATION_MS: f64 = 600.0;
pub const FOCUS_ZOOM: f64 = 4.0;
pub const FIT_PADDING_PX: f64 = 80.0;

/// The live drawing surface as seen by the viewport: node lookup plus
/// imperative camera commands. The surface owns the animation itself.
pub trait RenderSurface {
	/// Current graph-space position of a rendered node.
	fn node_position(&self, id: &str) -> Option<(f64, f64)>;
	fn center_on(&mut self, x: f64, y: f64, duration_ms: f64);
	fn zoom_to(&mut self, level: f64, duration_ms: f64);
	fn fit_to_view(&mut self, duration_ms: f64, padding_px: f64);
	fn set_size(&mut self, width: f64, height: f64);
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dimensions {
	pub width: f64,
	pub height: f64,
}

impl Default for Dimensions {
	fn default() -> Self {
		Self {
			width: 800.0,
			height: 600.0,
		}
	}
}

/// Keeps the surface sized to its container and moves the camera when the
/// selection changes.
#[derive(Clone, Debug, Default)]
pub struct ViewportController {
	dimensions: Dimensions,
	last_selected: Option<String>,
}

impl ViewportController {
	pub fn new(dimensions: Dimensions) -> Self {
		Self {
			dimensions,
			last_selected: None,
		}
	}

	pub fn dimensions(&self) -> Dimensions {
		self.dimensions
	}

	/// Container resize. Applied before the next frame is drawn.
	pub fn resize(&mut self, width: f64, height: f64, surface: &mut impl RenderSurface) {
		self.dimensions = Dimensions { width, height };
		surface.set_size(width, height);
	}

	/// Observes the current selection. Centers and zooms on a newly selected
	/// node when the surface already knows where it is; returns whether a
	/// camera command was issued.
	pub fn selection_changed(&mut self, selected: Option<&str>, surface: &mut impl RenderSurface) -> bool {
		if self.last_selected.as_deref() == selected {
			return false;
		}
		self.last_selected = selected.map(str::to_string);

		let Some(id) = selected else {
			return false;
		};
		let Some((x, y)) = surface.node_position(id) else {
			debug!("No position for {id} yet, skipping focus");
			return false;
		};
		debug!("Focusing {id} at ({x:.1}, {y:.1})");
		surface.center_on(x, y, FOCUS_DURATION_MS);
		surface.zoom_to(FOCUS_ZOOM, FOCUS_DURATION_MS);
		true
	}

	/// Fits the whole graph into view.
	pub fn reset_view(&self, surface: &mut impl RenderSurface) {
		surface.fit_to_view(FOCUS_DURATION_MS, FIT_PADDING_PX);
	}
}

#[cfg(test)]
mod tests {
	use std::collections::HashMap;

	use super::*;

	#[derive(Debug, PartialEq)]
	enum Command {
		Center(f64, f64, f64),
		Zoom(f64, f64),
		Fit(f64, f64),
		Size(f64, f64),
	}

	#[derive(Default)]
	struct RecordingSurface {
		positions: HashMap<String, (f64, f64)>,
		commands: Vec<Command>,
	}

	impl RenderSurface for RecordingSurface {
		fn node_position(&self, id: &str) -> Option<(f64, f64)> {
			self.positions.get(id).copied()
		}
		fn center_on(&mut self, x: f64, y: f64, duration_ms: f64) {
			self.commands.push(Command::Center(x, y, duration_ms));
		}
		fn zoom_to(&mut self, level: f64, duration_ms: f64) {
			self.commands.push(Command::Zoom(level, duration_ms));
		}
		fn fit_to_view(&mut self, duration_ms: f64, padding_px: f64) {
			self.commands.push(Command::Fit(duration_ms, padding_px));
		}
		fn set_size(&mut self, width: f64, height: f64) {
			self.commands.push(Command::Size(width, height));
		}
	}

	fn surface() -> RecordingSurface {
		RecordingSurface {
			positions: HashMap::from([("n1".to_string(), (10.0, -20.0))]),
			commands: Vec::new(),
		}
	}

	#[test]
	fn centers_and_zooms_on_new_selection() {
		let mut surface = surface();
		let mut viewport = ViewportController::default();
		assert!(viewport.selection_changed(Some("n1"), &mut surface));
		assert_eq!(
			surface.commands,
			vec![Command::Center(10.0, -20.0, 600.0), Command::Zoom(4.0, 600.0)]
		);
	}

	#[test]
	fn unknown_position_is_skipped() {
		let mut surface = surface();
		let mut viewport = ViewportController::default();
		assert!(!viewport.selection_changed(Some("ghost"), &mut surface));
		assert!(surface.commands.is_empty());
	}

	#[test]
	fn unchanged_or_cleared_selection_issues_nothing() {
		let mut surface = surface();
		let mut viewport = ViewportController::default();
		viewport.selection_changed(Some("n1"), &mut surface);
		surface.commands.clear();

		assert!(!viewport.selection_changed(Some("n1"), &mut surface));
		assert!(!viewport.selection_changed(None, &mut surface));
		assert!(surface.commands.is_empty());

		assert!(viewport.selection_changed(Some("n1"), &mut surface));
		assert_eq!(surface.commands.len(), 2);
	}

	#[test]
	fn reset_fits_with_padding() {
		let mut surface = surface();
		ViewportController::default().reset_view(&mut surface);
		assert_eq!(surface.commands, vec![Command::Fit(600.0, 80.0)]);
	}

	#[test]
	fn resize_updates_dimensions_and_surface() {
		let mut surface = surface();
		let mut viewport = ViewportController::new(Dimensions::default());
		viewport.resize(1024.0, 768.0, &mut surface);
		assert_eq!(
			viewport.dimensions(),
			Dimensions {
				width: 1024.0,
				height: 768.0
			}
		);
		assert_eq!(surface.commands, vec![Command::Size(1024.0, 768.0)]);
	}
}
