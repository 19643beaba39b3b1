//! Session state and its reducer
//!
//! Every input to the dashboard is an [`Event`]. [`reduce`] applies one event to a
//! [`SessionState`] and returns the next state; the filtered view is rebuilt by
//! [`recompute_derived_view`] whenever an aggregation input changes.

use crate::{
    aggregator::{self, FilteredView, SourceFilter, Window},
    dataset::{self, Dataset},
    days::{self, Day},
};

/// Which way a single-day step moves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Back,
    Forward,
}

impl Direction {
    pub fn sign(self) -> i64 {
        match self {
            Direction::Back => -1,
            Direction::Forward => 1,
        }
    }
}

/// Discrete inputs to the session, applied one at a time by [`reduce`]
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    StepDate(Direction),
    ToggleTimer,
    DatasetLoaded(Dataset),
    /// Fetch or decode failed; the session keeps its empty state
    DatasetFailed(String),
    EditDateInput(String),
    EditPostcodeInput(String),
    ToggleSource(String, bool),
    SetWindow(String),
    ToggleControlsVisible,
    /// Postcode hovered or clicked on the map layer
    ExternalHover(String),
    TimerTick,
    Shutdown,
}

/// Selected day and the bounds it is clamped to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub current: Day,
    pub min: Day,
    pub max: Day,
}

impl Default for DateRange {
    fn default() -> Self {
        Self {
            current: days::epoch(),
            min: days::epoch(),
            max: days::epoch(),
        }
    }
}

impl DateRange {
    fn clamp(&self, d: Day) -> Day {
        days::clamp_day(d, self.min, self.max)
    }

    pub fn at_max(&self) -> bool {
        self.current == self.max
    }

    pub fn at_min(&self) -> bool {
        self.current == self.min
    }
}

/// Everything the dashboard knows for the lifetime of the process
///
/// Mutated only through [`reduce`]; `view` is always the aggregation of the other fields.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub dates: DateRange,
    pub window: Window,
    pub sources: SourceFilter,
    pub dataset: Dataset,
    pub view: FilteredView,
    /// Raw text of the date field, possibly unparseable
    pub date_input: String,
    pub postcode_input: String,
    pub timer_running: bool,
    pub controls_visible: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            dates: DateRange::default(),
            window: Window::Unbounded,
            sources: SourceFilter::new(),
            dataset: Dataset::default(),
            view: FilteredView::new(),
            date_input: String::new(),
            postcode_input: String::new(),
            timer_running: false,
            controls_visible: true,
        }
    }

    /// Whether the date field currently holds a valid day
    pub fn date_input_valid(&self) -> bool {
        days::parse_day(&self.date_input).is_ok()
    }

    fn step(mut self, direction: Direction) -> Self {
        self.dates.current = self
            .dates
            .clamp(days::add_days(self.dates.current, direction.sign()));
        self.date_input = days::format_day(self.dates.current);

        if self.timer_running && self.dates.at_max() {
            log::debug!("Timer reached {}, stopping", self.date_input);
            self.timer_running = false;
        }

        recompute_derived_view(self)
    }
}

/// Rebuild the filtered view from the current aggregation inputs
pub fn recompute_derived_view(mut state: SessionState) -> SessionState {
    state.view = aggregator::aggregate(
        &state.dataset,
        state.dates.current,
        state.window,
        &state.sources,
    );
    state
}

/// Apply one event, returning the next state
pub fn reduce(mut state: SessionState, event: Event) -> SessionState {
    match event {
        Event::StepDate(direction) => state.step(direction),

        Event::TimerTick => {
            if !state.timer_running {
                log::trace!("Ignoring tick while timer is stopped");
                return state;
            }
            state.step(Direction::Forward)
        }

        Event::ToggleTimer => {
            if !state.timer_running && state.dates.at_max() {
                let restart = days::add_days(state.dates.min, state.window.num_days());
                state.dates.current = state.dates.clamp(restart);
                state.date_input = days::format_day(state.dates.current);
                state.timer_running = true;
                recompute_derived_view(state)
            } else {
                state.timer_running = !state.timer_running;
                state
            }
        }

        Event::DatasetLoaded(dataset) => {
            let min = dataset::min_date(&dataset);
            let max = dataset::max_date(&dataset);

            state.sources = dataset::discover_sources(&dataset)
                .into_iter()
                .map(|source| (source, true))
                .collect();
            state.dates = DateRange {
                current: max,
                min,
                max,
            };
            state.date_input = days::format_day(max);
            state.dataset = dataset;
            recompute_derived_view(state)
        }

        Event::DatasetFailed(_) | Event::Shutdown => state,

        Event::EditDateInput(text) => match days::parse_day(&text) {
            Ok(parsed) => {
                state.dates.current = state.dates.clamp(days::start_of_day(parsed));
                state.date_input = text;
                recompute_derived_view(state)
            }
            Err(_) => {
                state.date_input = text;
                state
            }
        },

        Event::EditPostcodeInput(text) | Event::ExternalHover(text) => {
            state.postcode_input = text;
            state
        }

        Event::ToggleSource(name, included) => {
            state.sources.insert(name, included);
            recompute_derived_view(state)
        }

        Event::SetWindow(text) => {
            state.window = Window::parse(&text);
            recompute_derived_view(state)
        }

        Event::ToggleControlsVisible => {
            state.controls_visible = !state.controls_visible;
            state
        }
    }
}
