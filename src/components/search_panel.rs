//! Semantic search form and result list.

use leptos::prelude::*;
use log::error;

use crate::api::{SearchResult, semantic_search};
use crate::config::AppConfig;

/// Free-text semantic search over the chunks of a chapter.
#[component]
pub fn SearchPanel(
	/// Chapter whose chunks are searched.
	#[prop(into)]
	chapter_id: Signal<String>,
	/// Called with the chunk id of a clicked result.
	#[prop(into)]
	on_select_chunk: Callback<String>,
) -> impl IntoView {
	let config = expect_context::<AppConfig>();
	let (query, set_query) = signal(String::new());

	let search = Action::new_local(move |(chapter, query): &(String, String)| {
		let (config, chapter, query) = (config.clone(), chapter.clone(), query.clone());
		async move {
			semantic_search(&config, &chapter, &query)
				.await
				.map_err(|e| {
					error!("Search for {query:?} in {chapter} failed: {e}");
					e.to_string()
				})
		}
	});
	let pending = search.pending();

	let on_submit = move |ev: leptos::ev::SubmitEvent| {
		ev.prevent_default();
		let query = query.get();
		if query.is_empty() {
			return;
		}
		search.dispatch((chapter_id.get(), query));
	};

	let result_card = move |result: SearchResult| {
		let chunk_id = result.chunk_id.clone();
		view! {
			<button class="result-card" on:click=move |_| on_select_chunk.run(chunk_id.clone())>
				<div class="score">{format!("{:.2}", result.score)}</div>
				<div>
					<h4>{result.chunk_id}</h4>
					<p>{result.summary}</p>
				</div>
			</button>
		}
	};

	view! {
		<div class="search-panel">
			<form on:submit=on_submit class="search-form">
				<input
					type="text"
					placeholder="Ask something…"
					prop:value=query
					on:input=move |ev| set_query.set(event_target_value(&ev))
				/>
				<button type="submit" disabled=move || pending.get()>
					{move || if pending.get() { "Searching…" } else { "Search" }}
				</button>
			</form>
			<div class="search-results">
				{move || {
					search
						.value()
						.get()
						.map(|outcome| match outcome {
							Ok(results) => results.into_iter().map(result_card).collect_view().into_any(),
							Err(_) => {
								view! {
									<p class="error">"Unable to search. Try regenerating embeddings."</p>
								}
									.into_any()
							}
						})
				}}
			</div>
		</div>
	}
}
