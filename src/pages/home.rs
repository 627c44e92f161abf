use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::force_graph::{ForceGraphCanvas, GraphData, LinkSelection};
use crate::components::link_popup::LinkPopup;
use crate::data::{DataSources, LoadError, load_graph};

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let (graph, set_graph) = signal(None::<Result<GraphData, LoadError>>);
	let (selected, set_selected) = signal(None::<LinkSelection>);
	let (reset, set_reset) = signal(0u32);
	let on_select_link = Callback::new(move |sel: Option<LinkSelection>| set_selected.set(sel));

	spawn_local(async move {
		let result = load_graph(&DataSources::default()).await;
		set_graph.set(Some(result));
	});

	view! {
		<div class="graph-page">
			<div class="graph-toolbar">
				<h1>"Relationship Graph"</h1>
				<button id="reset-button" on:click=move |_| set_reset.update(|n| *n += 1)>
					"Reset"
				</button>
			</div>

			<div id="chart" class="graph-container">
				{move || {
					graph
						.with(Option::is_none)
						.then(|| view! { <p class="graph-status">"Loading data…"</p> })
				}}
				<ErrorBoundary fallback=|errors| {
					view! {
						<h2>"Error loading or processing the data"</h2>
						<ul>
							{move || {
								errors
									.get()
									.into_iter()
									.map(|(_, e)| view! { <li>{e.to_string()}</li> })
									.collect_view()
							}}
						</ul>
					}
				}>
					{move || {
						graph
							.get()
							.map(|result| {
								result
									.map(|data| {
										view! {
											<ForceGraphCanvas
												data=Signal::derive(move || data.clone())
												reset=reset
												on_select_link=on_select_link
											/>
										}
									})
							})
					}}
				</ErrorBoundary>
				<LinkPopup selection=selected on_close={move |_: ()| set_selected.set(None)} />
			</div>

			<p class="subtitle">
				"Drag a node to pin it, double-click to release it. "
				"Scroll to zoom, drag the background to pan. Click a link for its sources."
			</p>
		</div>
	}
}
