//! Reusable UI components.

pub mod chunk_detail;
pub mod force_graph;
pub mod search_panel;
