//! Interactive force-directed knowledge-graph canvas.

mod adjacency;
mod camera;
mod canvas;
mod component;
mod highlight;
mod interaction;
mod layout;
mod model;
mod render;
mod state;
mod types;
mod viewport;

pub use component::ForceGraphCanvas;
pub use types::{Edge, Node, NodeType};
