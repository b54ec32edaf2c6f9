use leptos::prelude::*;
use log::{error, info};

use crate::api::{GraphPayload, chunk_for_node, fetch_graph, trigger_ingest};
use crate::components::chunk_detail::ChunkDetail;
use crate::components::force_graph::ForceGraphCanvas;
use crate::components::search_panel::SearchPanel;
use crate::config::AppConfig;

/// Application shell: chapter controls, search, chunk detail and the graph.
#[component]
pub fn Home() -> impl IntoView {
	let config = expect_context::<AppConfig>();
	let (chapter_id, set_chapter_id) = signal(config.default_chapter.clone());
	let (selected_node_id, set_selected_node_id) = signal(None::<String>);
	let (selected_chunk_id, set_selected_chunk_id) = signal(None::<String>);

	let graph_config = config.clone();
	let graph = LocalResource::new(move || {
		let (config, chapter) = (graph_config.clone(), chapter_id.get());
		async move {
			fetch_graph(&config, &chapter).await.map_err(|e| {
				error!("Loading graph for {chapter} failed: {e}");
				e.to_string()
			})
		}
	});

	let ingest = Action::new_local(move |chapter: &String| {
		let (config, chapter) = (config.clone(), chapter.clone());
		async move {
			let source_path = format!("data/input/{chapter}.txt");
			trigger_ingest(&config, &chapter, Some(&source_path))
				.await
				.map_err(|e| {
					error!("Ingest of {chapter} failed: {e}");
					e.to_string()
				})
		}
	});
	let ingest_pending = ingest.pending();

	Effect::new(move |_| {
		if let Some(Ok(status)) = ingest.value().get() {
			info!("Pipeline {} for {:?}", status.status, status.chapter_id);
			graph.refetch();
		}
	});

	// Content-compared, so a refetch with identical data keeps the graph as is.
	let payload = Memo::new(move |_| graph.get().and_then(Result::ok));
	let nodes = Signal::derive(move || {
		payload.with(|p| p.as_ref().map(|p| p.nodes.clone()).unwrap_or_default())
	});
	let edges = Signal::derive(move || {
		payload.with(|p| p.as_ref().map(|p| p.edges.clone()).unwrap_or_default())
	});
	let has_nodes = move || payload.with(|p| p.as_ref().is_some_and(|p| !p.nodes.is_empty()));
	let is_loading = move || graph.get().is_none();
	let load_failed = move || matches!(graph.get(), Some(Err(_)));

	let selected_chunk = Signal::derive(move || {
		let chunk_id = selected_chunk_id.get()?;
		payload.with(|p| p.as_ref().and_then(|p: &GraphPayload| p.chunk(&chunk_id).cloned()))
	});

	let handle_node_select = Callback::new(move |node_id: String| {
		let chunk_id = payload.with(|p| {
			p.as_ref()
				.and_then(|p| chunk_for_node(&p.nodes, &node_id).map(str::to_string))
		});
		set_selected_node_id.set(Some(node_id));
		if let Some(chunk_id) = chunk_id {
			set_selected_chunk_id.set(Some(chunk_id));
		}
	});
	let handle_background_click = Callback::new(move |_: ()| set_selected_node_id.set(None));
	let handle_chunk_select = Callback::new(move |chunk_id: String| {
		set_selected_chunk_id.set(Some(chunk_id));
		set_selected_node_id.set(None);
	});

	let ingest_feedback = move || {
		ingest.value().get().map(|outcome| match outcome {
			Ok(status) if status.is_queued() => view! {
				<small class="hint">"Pipeline queued. Refresh to see new data."</small>
			}
			.into_any(),
			Ok(status) => {
				let message = status.message.unwrap_or_else(|| status.status.clone());
				view! { <small class="error">{message}</small> }.into_any()
			}
			Err(message) => view! { <small class="error">{message}</small> }.into_any(),
		})
	};

	view! {
		<div class="app-shell">
			<aside class="sidebar">
				<header>
					<h1>"Medical Knowledge Graph"</h1>
					<p>"Generate study notes and explore relationships across the chapter."</p>
				</header>
				<div class="controls">
					<label for="chapter">"Chapter ID"</label>
					<input
						id="chapter"
						placeholder="chapter1"
						prop:value=chapter_id
						on:change=move |ev| set_chapter_id.set(event_target_value(&ev))
					/>
					<button
						on:click=move |_| {
							ingest.dispatch(chapter_id.get());
						}
						disabled=move || ingest_pending.get()
					>
						{move || if ingest_pending.get() { "Generating…" } else { "Generate / Refresh" }}
					</button>
					{ingest_feedback}
					<Show when=load_failed>
						<p class="error">"Load a chapter to view the graph."</p>
					</Show>
				</div>
				<SearchPanel chapter_id=chapter_id on_select_chunk=handle_chunk_select />
				<ChunkDetail chunk=selected_chunk />
			</aside>
			<main class="graph-area">
				<Show when=is_loading>
					<p class="loading">"Loading graph…"</p>
				</Show>
				<Show
					when=has_nodes
					fallback=move || {
						view! {
							<Show when=move || !is_loading()>
								<p class="empty-state">"Run the pipeline to visualize the graph."</p>
							</Show>
						}
					}
				>
					<ForceGraphCanvas
						nodes=nodes
						edges=edges
						selected_node_id=selected_node_id
						on_node_select=handle_node_select
						on_background_click=handle_background_click
					/>
				</Show>
			</main>
		</div>
	}
}

