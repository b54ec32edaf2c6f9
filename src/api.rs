//! Backend collaborators: graph payloads, chunk summaries, semantic search
//! and pipeline ingestion.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response};

use crate::components::force_graph::{Edge, Node};
use crate::config::AppConfig;

/// Failure talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
	/// No browser window to fetch from.
	#[error("browser APIs unavailable")]
	Unavailable,
	/// The request never produced a response.
	#[error("network error: {0}")]
	Network(String),
	/// The backend answered with a non-success status.
	#[error("request failed with status {status}")]
	Status {
		/// HTTP status code.
		status: u16,
	},
	/// The response body did not match the expected shape.
	#[error("malformed response: {0}")]
	Decode(#[from] serde_json::Error),
	/// Any other JavaScript exception.
	#[error("{0}")]
	Js(String),
}

impl From<JsValue> for ApiError {
	fn from(value: JsValue) -> Self {
		ApiError::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
	}
}

/// A question/answer flashcard.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QaPair {
	/// Prompt side.
	pub question: String,
	/// Answer side.
	pub answer: String,
}

/// Summary of one source chunk.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChunkSummary {
	/// Chunk identifier.
	pub chunk_id: String,
	/// Prose summary.
	pub summary: String,
	/// Bullet points.
	#[serde(default)]
	pub key_points: Vec<String>,
	/// Entities mentioned in the chunk.
	#[serde(default)]
	pub entities: Vec<String>,
	/// Flashcards.
	#[serde(default)]
	pub qa_pairs: Vec<QaPair>,
}

/// Everything the backend knows about one chapter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphPayload {
	/// Chapter identifier.
	pub chapter_id: String,
	/// Raw entities.
	pub nodes: Arc<Vec<Node>>,
	/// Raw relations, possibly dangling.
	pub edges: Arc<Vec<Edge>>,
	/// Chunk summaries referenced by the nodes.
	#[serde(default)]
	pub chunks: Vec<ChunkSummary>,
}

impl GraphPayload {
	/// Summary of a chunk by id.
	pub fn chunk(&self, chunk_id: &str) -> Option<&ChunkSummary> {
		self.chunks.iter().find(|c| c.chunk_id == chunk_id)
	}
}

/// First chunk a node was extracted from.
pub fn chunk_for_node<'a>(nodes: &'a [Node], node_id: &str) -> Option<&'a str> {
	nodes
		.iter()
		.find(|n| n.id == node_id)
		.and_then(|n| n.chunk_ids.first())
		.map(String::as_str)
}

/// One ranked semantic search hit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
	/// Matching chunk.
	pub chunk_id: String,
	/// Similarity score.
	pub score: f64,
	/// Chunk summary.
	pub summary: String,
	/// Chunk key points.
	#[serde(default)]
	pub key_points: Vec<String>,
}

#[derive(Deserialize)]
struct SearchResponse {
	results: Vec<SearchResult>,
}

#[derive(Serialize)]
struct SearchRequest<'a> {
	chapter_id: &'a str,
	query: &'a str,
}

#[derive(Serialize)]
struct IngestRequest<'a> {
	chapter_id: &'a str,
	#[serde(skip_serializing_if = "Option::is_none")]
	source_path: Option<&'a str>,
}

/// Backend acknowledgement of an ingestion request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IngestStatus {
	/// `queued` or `error`.
	pub status: String,
	/// Chapter that was queued.
	#[serde(default)]
	pub chapter_id: Option<String>,
	/// Reason when `status` is `error`.
	#[serde(default)]
	pub message: Option<String>,
}

impl IngestStatus {
	/// Whether the pipeline run was accepted.
	pub fn is_queued(&self) -> bool {
		self.status == "queued"
	}
}

async fn request<T: DeserializeOwned>(url: &str, body: Option<String>) -> Result<T, ApiError> {
	let window = web_sys::window().ok_or(ApiError::Unavailable)?;

	let init = RequestInit::new();
	if let Some(body) = body {
		let headers = Headers::new()?;
		headers.set("Content-Type", "application/json")?;
		init.set_method("POST");
		init.set_headers(&headers);
		init.set_body(&JsValue::from_str(&body));
	} else {
		init.set_method("GET");
	}
	let request = Request::new_with_str_and_init(url, &init)?;

	let response: Response = JsFuture::from(window.fetch_with_request(&request))
		.await
		.map_err(|e| ApiError::Network(format!("{e:?}")))?
		.dyn_into()?;
	if !response.ok() {
		return Err(ApiError::Status {
			status: response.status(),
		});
	}
	let text = JsFuture::from(response.text()?)
		.await?
		.as_string()
		.unwrap_or_default();
	Ok(serde_json::from_str(&text)?)
}

/// `GET /graph/{chapter_id}`.
pub async fn fetch_graph(config: &AppConfig, chapter_id: &str) -> Result<GraphPayload, ApiError> {
	request(&config.url(&format!("graph/{chapter_id}")), None).await
}

/// `POST /search`: top chunks for a free-text query within a chapter.
pub async fn semantic_search(
	config: &AppConfig,
	chapter_id: &str,
	query: &str,
) -> Result<Vec<SearchResult>, ApiError> {
	let body = serde_json::to_string(&SearchRequest { chapter_id, query })?;
	let response: SearchResponse = request(&config.url("search"), Some(body)).await?;
	Ok(response.results)
}

/// `POST /ingest`: queue the extraction pipeline for a chapter.
pub async fn trigger_ingest(
	config: &AppConfig,
	chapter_id: &str,
	source_path: Option<&str>,
) -> Result<IngestStatus, ApiError> {
	let body = serde_json::to_string(&IngestRequest {
		chapter_id,
		source_path,
	})?;
	request(&config.url("ingest"), Some(body)).await
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::NodeType;

	const PAYLOAD: &str = r#"{
		"chapter_id": "chapter1",
		"nodes": [
			{"id": "n1", "label": "Insulin", "type": "treatment", "chunk_ids": ["c1", "c2"]},
			{"id": "n2", "label": "Pancreas", "type": "organ"},
			{"id": "n3", "label": "Glucose"}
		],
		"edges": [
			{"id": "e1", "source": "n1", "target": "n3", "relation": "lowers", "evidence_chunk": "c1"}
		],
		"chunks": [
			{"chunk_id": "c1", "summary": "Insulin lowers glucose.", "key_points": ["a"], "entities": [],
			 "qa_pairs": [{"question": "What lowers glucose?", "answer": "Insulin"}]}
		]
	}"#;

	#[test]
	fn parses_graph_payload() {
		let payload: GraphPayload = serde_json::from_str(PAYLOAD).unwrap();
		assert_eq!(payload.nodes[0].kind, NodeType::Treatment);
		assert_eq!(payload.nodes[1].kind, NodeType::Other);
		assert_eq!(payload.nodes[2].kind, NodeType::Concept);
		assert!(payload.nodes[2].chunk_ids.is_empty());
		assert_eq!(payload.edges[0].weight, 1.0);
		assert_eq!(payload.chunk("c1").unwrap().qa_pairs[0].answer, "Insulin");
		assert!(payload.chunk("c9").is_none());
	}

	#[test]
	fn node_maps_to_first_chunk() {
		let payload: GraphPayload = serde_json::from_str(PAYLOAD).unwrap();
		assert_eq!(chunk_for_node(&payload.nodes, "n1"), Some("c1"));
		assert_eq!(chunk_for_node(&payload.nodes, "n2"), None);
		assert_eq!(chunk_for_node(&payload.nodes, "nope"), None);
	}

	#[test]
	fn parses_search_and_ingest_responses() {
		let response: SearchResponse = serde_json::from_str(
			r#"{"results": [{"chunk_id": "c1", "score": 0.91, "summary": "s", "key_points": []}]}"#,
		)
		.unwrap();
		assert_eq!(response.results[0].chunk_id, "c1");

		let status: IngestStatus =
			serde_json::from_str(r#"{"status": "queued", "chapter_id": "chapter1"}"#).unwrap();
		assert!(status.is_queued());
	}

	#[test]
	fn ingest_request_omits_missing_path() {
		let body = serde_json::to_string(&IngestRequest {
			chapter_id: "c",
			source_path: None,
		})
		.unwrap();
		assert_eq!(body, r#"{"chapter_id":"c"}"#);
	}
}
