use chrono::{DateTime, FixedOffset};
use comfy_table::Cell;

use crate::cli::SortOrder;
use crate::output::format::{create_styled_table, header_cell, to_pretty_json};
use crate::session::SessionSummary;
use crate::utils::Timezone;

#[derive(Debug, Clone, Copy)]
pub(crate) struct SessionListOptions {
    pub(crate) order: SortOrder,
    pub(crate) use_color: bool,
    pub(crate) timezone: Timezone,
}

/// Instant of the last turn; unparseable timestamps sort first
fn last_activity(summary: &SessionSummary) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(&summary.last_timestamp).ok()
}

/// Sort by last activity instant, then id for sessions at the same instant
fn sort_summaries(summaries: &[SessionSummary], order: SortOrder) -> Vec<&SessionSummary> {
    let mut sorted: Vec<_> = summaries.iter().collect();
    sorted.sort_by(|a, b| {
        last_activity(a)
            .cmp(&last_activity(b))
            .then_with(|| a.session_id.cmp(&b.session_id))
    });
    if matches!(order, SortOrder::Desc) {
        sorted.reverse();
    }
    sorted
}

pub(crate) fn print_session_list(summaries: &[SessionSummary], options: SessionListOptions) {
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Session", options.use_color),
        header_cell("Turns", options.use_color),
        header_cell("Started", options.use_color),
        header_cell("Last Activity", options.use_color),
    ]);

    for summary in sort_summaries(summaries, options.order) {
        table.add_row(vec![
            Cell::new(&summary.session_id),
            Cell::new(summary.turns),
            Cell::new(options.timezone.format_timestamp(&summary.first_timestamp)),
            Cell::new(options.timezone.format_timestamp(&summary.last_timestamp)),
        ]);
    }

    println!("\n  Chat Sessions\n");
    println!("{table}");
    println!("\n  {} sessions\n", summaries.len());
}

pub(crate) fn output_session_list_json(summaries: &[SessionSummary], order: SortOrder) -> String {
    let output: Vec<serde_json::Value> = sort_summaries(summaries, order)
        .into_iter()
        .map(|summary| {
            serde_json::json!({
                "session_id": summary.session_id,
                "turns": summary.turns,
                "first_timestamp": summary.first_timestamp,
                "last_timestamp": summary.last_timestamp,
            })
        })
        .collect();
    to_pretty_json(&serde_json::Value::Array(output), "[]")
}
