use leptos::prelude::*;

/// Range and position shown by the step slider.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SliderState {
	pub min: usize,
	pub max: usize,
	pub value: usize,
}

/// Slider, readout and step buttons. Every change is reported, never applied here.
#[component]
pub fn StepControls(
	#[prop(into)] slider: Signal<SliderState>,
	#[prop(into)] on_step: Callback<usize>,
	#[prop(into)] on_reset: Callback<()>,
	#[prop(into)] on_back: Callback<()>,
	#[prop(into)] on_forward: Callback<()>,
	#[prop(into)] on_full_graph: Callback<()>,
) -> impl IntoView {
	view! {
		<div class="step-controls">
			<button on:click=move |_| on_reset.run(())>"Reset"</button>
			<button on:click=move |_| on_back.run(())>"Previous"</button>
			<input
				type="range"
				class="step-slider"
				min=move || slider.get().min.to_string()
				max=move || slider.get().max.to_string()
				prop:value=move || slider.get().value.to_string()
				on:input=move |ev| {
					if let Ok(step) = event_target_value(&ev).parse::<usize>() {
						on_step.run(step);
					}
				}
			/>
			<button on:click=move |_| on_forward.run(())>"Next"</button>
			<button on:click=move |_| on_full_graph.run(())>"Full graph"</button>
			<span class="step-readout">
				{move || {
					let s = slider.get();
					format!("Step {} / {}", s.value, s.max)
				}}
			</span>
		</div>
	}
}
