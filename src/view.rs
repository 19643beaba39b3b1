//! Render-model projection
//!
//! A plain snapshot of what the presentation layer should draw. Built from the session
//! state after every event; the UI never reads [`SessionState`] directly.

use {
    crate::{
        aggregator::{self, FilteredView, Window},
        dataset::SourceCounts,
        days,
        state::SessionState,
    },
    serde::Serialize,
};

/// One checkbox in the source list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceToggle {
    pub name: String,
    pub included: bool,
}

/// One day of a postcode's history, up to the reference day
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailRow {
    pub day: String,
    pub counts: SourceCounts,
    /// Whether the day falls inside the active window
    pub in_window: bool,
}

/// Detail panel for the postcode typed or hovered
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostcodeDetail {
    pub postcode: String,
    pub cases: u64,
    pub tests: u64,
    pub rows: Vec<DetailRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderModel {
    pub loaded: bool,
    pub date_text: String,
    pub date_valid: bool,
    pub can_step_back: bool,
    pub can_step_forward: bool,
    pub timer_running: bool,
    pub timer_label: &'static str,
    /// "any" followed by 1..N
    pub window_options: Vec<String>,
    pub window_selected: String,
    pub sources: Vec<SourceToggle>,
    pub postcode_text: String,
    pub detail: Option<PostcodeDetail>,
    pub total_cases: u64,
    pub postcode_count: usize,
    /// Postcodes by descending case count, ties by postcode
    pub ranked: Vec<(String, u64)>,
    pub controls_visible: bool,
}

/// Window selector entries: "any" plus every day count up to the elapsed range
pub fn window_options(state: &SessionState) -> Vec<String> {
    let elapsed = days::days_between(state.dates.min, state.dates.current).max(0);
    std::iter::once(Window::Unbounded.to_string())
        .chain((1..=elapsed).map(|n| n.to_string()))
        .collect()
}

pub fn ranked_postcodes(view: &FilteredView) -> Vec<(String, u64)> {
    let mut ranked: Vec<(String, u64)> = view.iter().map(|(p, c)| (p.clone(), *c)).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked
}

/// Detail for an exact postcode match, or `None` when nothing matches
pub fn postcode_detail(state: &SessionState, postcode: &str) -> Option<PostcodeDetail> {
    let record = state.dataset.find(postcode.trim())?;
    let reference = state.dates.current;
    let lower = state
        .window
        .lower_bound(reference, crate::dataset::min_date(&state.dataset));

    let mut rows: Vec<DetailRow> = record
        .infections
        .iter()
        .filter_map(|(key, counts)| {
            let day = days::parse_day(key).ok()?;
            if day > reference {
                return None;
            }
            Some(DetailRow {
                day: days::format_day(day),
                counts: counts
                    .iter()
                    .filter(|(source, _)| aggregator::source_included(&state.sources, source))
                    .map(|(source, count)| (source.clone(), *count))
                    .collect(),
                in_window: day > lower,
            })
        })
        .collect();
    rows.sort_by(|a, b| b.day.cmp(&a.day));

    Some(PostcodeDetail {
        postcode: record.postcode.clone(),
        cases: state.view.get(&record.postcode).copied().unwrap_or(0),
        tests: record.tests,
        rows,
    })
}

pub fn render_model(state: &SessionState) -> RenderModel {
    RenderModel {
        loaded: !state.dataset.is_empty(),
        date_text: state.date_input.clone(),
        date_valid: state.date_input_valid(),
        can_step_back: !state.dates.at_min(),
        can_step_forward: !state.dates.at_max(),
        timer_running: state.timer_running,
        timer_label: if state.timer_running { "Stop" } else { "Play" },
        window_options: window_options(state),
        window_selected: state.window.to_string(),
        sources: state
            .sources
            .iter()
            .map(|(name, included)| SourceToggle {
                name: name.clone(),
                included: *included,
            })
            .collect(),
        postcode_text: state.postcode_input.clone(),
        detail: postcode_detail(state, &state.postcode_input),
        total_cases: aggregator::total_cases(&state.view),
        postcode_count: state.view.len(),
        ranked: ranked_postcodes(&state.view),
        controls_visible: state.controls_visible,
    }
}
