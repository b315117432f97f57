use leptos::prelude::*;

use crate::report::SourceFile;

/// Row id for a source line, also used to scroll it into view.
fn row_id(line: u32) -> String {
	format!("source-{}", line)
}

/// Line-numbered source listing with the replay's marked line highlighted.
#[component]
pub fn SourcePanel(
	sources: Vec<SourceFile>,
	#[prop(into)] marked_line: Signal<Option<u32>>,
) -> impl IntoView {
	let names: Vec<String> = sources.iter().map(|f| f.name.clone()).collect();
	let sources = StoredValue::new(sources);
	let selected = RwSignal::new(0usize);

	Effect::new(move |_| {
		let Some(line) = marked_line.get() else {
			return;
		};
		if let Some(row) = web_sys::window()
			.and_then(|w| w.document())
			.and_then(|d| d.get_element_by_id(&row_id(line)))
		{
			row.scroll_into_view_with_bool(false);
		}
	});

	let picker = (names.len() > 1).then(|| {
		view! {
			<select
				class="source-picker"
				on:change=move |ev| {
					if let Ok(index) = event_target_value(&ev).parse::<usize>() {
						selected.set(index);
					}
				}
			>
				{names
					.into_iter()
					.enumerate()
					.map(|(i, name)| view! { <option value=i.to_string()>{name}</option> })
					.collect_view()}
			</select>
		}
	});

	view! {
		<div class="source-panel">
			{picker}
			{move || {
				let index = selected.get();
				sources
					.with_value(|files| {
						files
							.get(index)
							.map(|file| {
								file.numbered_lines()
									.map(|(n, text)| {
										let text = text.to_owned();
										view! {
											<tr id=row_id(n)>
												<td class="line-number">{n}</td>
												<td>
													<pre class=(
														"marked-source-line",
														move || marked_line.get() == Some(n),
													)>{text}</pre>
												</td>
											</tr>
										}
									})
									.collect_view()
							})
					})
					.map(|rows| view! { <table class="source-table">{rows}</table> })
			}}
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::row_id;

	#[test]
	fn rows_are_addressed_by_line() {
		assert_eq!(row_id(42), "source-42");
	}
}
