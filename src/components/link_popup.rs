use leptos::prelude::*;

use crate::components::force_graph::LinkSelection;

/// Metadata card for the clicked link: relationship, endpoints, details and
/// the citations behind it.
#[component]
pub fn LinkPopup(
	#[prop(into)] selection: Signal<Option<LinkSelection>>,
	#[prop(into)] on_close: Callback<()>,
) -> impl IntoView {
	move || {
		selection.get().map(|sel| {
			let (x, y) = sel.anchor;
			let position = format!("left: {}px; top: {}px;", x + 12.0, y + 12.0);
			let endpoints = format!("{} → {}", sel.source, sel.target);
			let details = sel
				.details
				.map(|details| view! { <p class="link-popup-details">{details}</p> });
			let references = sel
				.references
				.into_iter()
				.map(|entry| {
					let date = entry.publication_date.map(|date| format!(" ({date})"));
					view! {
						<li>
							<a href=entry.url target="_blank" rel="noopener noreferrer">
								{entry.title}
							</a>
							{date.map(|date| view! { <span class="date">{date}</span> })}
						</li>
					}
				})
				.collect::<Vec<_>>();
			let sources = (!references.is_empty()).then(|| {
				view! {
					<h4>"Sources"</h4>
					<ul>{references}</ul>
				}
			});
			view! {
				<div class="link-popup" style=position>
					<button class="link-popup-close" on:click=move |_| on_close.run(())>
						"×"
					</button>
					<h3 style=format!("color: {};", sel.color)>{sel.kind}</h3>
					<p class="link-popup-endpoints">{endpoints}</p>
					{details}
					{sources}
				</div>
			}
		})
	}
}
