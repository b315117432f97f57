use leptos::prelude::*;

use crate::components::replay_viewer::ReplayViewer;
use crate::report::{DATA_ELEMENT, Report, ReportError};

/// Report page: the replay viewer over the embedded ARG.
#[component]
pub fn Home() -> impl IntoView {
	let report = use_context::<Result<Report, ReportError>>()
		.unwrap_or(Err(ReportError::MissingElement(DATA_ELEMENT)));

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! The report could not be loaded."</h1>

				<p>"Errors: "</p>
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
			{move || report.clone().map(|report| view! { <ReplayViewer report=report /> })}
		</ErrorBoundary>
	}
}
