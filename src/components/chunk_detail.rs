//! Detail panel for one chunk summary.

use leptos::prelude::*;

use crate::api::ChunkSummary;

/// Summary, key points and flashcards of the selected chunk.
#[component]
pub fn ChunkDetail(
	/// Chunk to show; `None` renders the empty state.
	#[prop(into)]
	chunk: Signal<Option<ChunkSummary>>,
) -> impl IntoView {
	move || match chunk.get() {
		None => view! {
			<div class="chunk-detail empty">
				<p>"Select a node or search result to see details."</p>
			</div>
		}
		.into_any(),
		Some(chunk) => {
			let key_points = chunk
				.key_points
				.into_iter()
				.map(|point| view! { <li>{point}</li> })
				.collect_view();
			let flashcards = chunk
				.qa_pairs
				.into_iter()
				.map(|pair| {
					view! {
						<li>
							<strong>"Q:"</strong>
							" "
							{pair.question}
							<br />
							<strong>"A:"</strong>
							" "
							{pair.answer}
						</li>
					}
				})
				.collect_view();

			view! {
				<div class="chunk-detail">
					<h3>{chunk.chunk_id}</h3>
					<p class="summary">{chunk.summary}</p>
					<div class="key-points">
						<h4>"Key Points"</h4>
						<ul>{key_points}</ul>
					</div>
					<div class="qa">
						<h4>"Flashcards"</h4>
						<ul>{flashcards}</ul>
					</div>
				</div>
			}
			.into_any()
		}
	}
}
