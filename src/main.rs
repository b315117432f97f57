//! Browser entry point: load the embedded report and mount the viewer.

use arg_replay::{App, Report, init_logging};
use leptos::prelude::*;

fn main() {
	let report = Report::from_document();
	let level = report
		.as_ref()
		.map(|r| r.config.log_level)
		.unwrap_or_default();
	init_logging(level.to_level());

	mount_to_body(move || view! { <App report=report.clone() /> })
}
