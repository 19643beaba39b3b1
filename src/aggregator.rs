//! Rolling-window case aggregator
//!
//! Collapses every postcode's dated, per-source counts into a single number for the
//! selected reference day. Uses a strict day cutoff: an entry counts when its day lies in
//! the half-open interval `(lower, reference]`.
//!
//! The view is rebuilt from scratch on each call; there is no incremental update.

use {
    crate::{
        dataset::{self, Dataset},
        days::{self, Day},
    },
    std::collections::BTreeMap,
};

/// Source name → whether its counts are summed. Empty means every source is included.
pub type SourceFilter = BTreeMap<String, bool>;

/// Postcode → aggregated case count
pub type FilteredView = BTreeMap<String, u64>;

/// Trailing lookback from the reference day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Window {
    /// Everything up to the reference day
    #[default]
    Unbounded,
    /// The last `n` days, reference day included
    Days(i64),
}

impl Window {
    /// Integer text selects a day count; anything else falls back to `Unbounded`
    pub fn parse(text: &str) -> Self {
        text.trim()
            .parse::<i64>()
            .map(Window::Days)
            .unwrap_or(Window::Unbounded)
    }

    /// Length in days, 0 for `Unbounded`
    pub fn num_days(&self) -> i64 {
        match self {
            Window::Unbounded => 0,
            Window::Days(n) => *n,
        }
    }

    /// Exclusive lower bound of the window ending at `reference`
    ///
    /// `Unbounded` starts the day before the dataset's earliest day so that day is counted.
    pub fn lower_bound(&self, reference: Day, dataset_min: Day) -> Day {
        match self {
            Window::Unbounded => days::add_days(dataset_min, -1),
            Window::Days(n) => days::add_days(reference, n.saturating_neg()),
        }
    }
}

impl std::fmt::Display for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Window::Unbounded => write!(f, "any"),
            Window::Days(n) => write!(f, "{}", n),
        }
    }
}

/// Whether a source's counts are summed under `filter`
pub fn source_included(filter: &SourceFilter, source: &str) -> bool {
    filter.is_empty() || filter.get(source).copied().unwrap_or(false)
}

/// Sum in-window, included-source counts for every postcode
///
/// Unparseable day keys contribute nothing. Duplicate postcodes overwrite earlier ones.
/// Totals saturate at `u64::MAX`.
pub fn aggregate(
    dataset: &Dataset,
    reference: Day,
    window: Window,
    filter: &SourceFilter,
) -> FilteredView {
    let lower = window.lower_bound(reference, dataset::min_date(dataset));
    let mut view = FilteredView::new();

    for record in dataset.records() {
        let mut total = 0u64;

        for (key, counts) in &record.infections {
            let Ok(day) = days::parse_day(key) else {
                continue;
            };
            if day <= lower || day > reference {
                continue;
            }

            total = counts
                .iter()
                .filter(|(source, _)| source_included(filter, source))
                .fold(total, |acc, (_, count)| acc.saturating_add(*count));
        }

        view.insert(record.postcode.clone(), total);
    }

    view
}

/// Sum of every postcode in a view, saturating at `u64::MAX`
pub fn total_cases(view: &FilteredView) -> u64 {
    view.values().fold(0, |acc, count| acc.saturating_add(*count))
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::dataset::{discover_sources, tests::record},
    };

    fn day(s: &str) -> Day {
        days::parse_day(s).unwrap()
    }

    fn scenario() -> Dataset {
        Dataset::new(vec![record(
            "2000",
            vec![
                ("2020-04-01", vec![("confirmed", 3)]),
                ("2020-04-05", vec![("confirmed", 2), ("probable", 1)]),
            ],
            100,
        )])
    }

    #[test]
    fn test_window_parse() {
        assert_eq!(Window::parse("7"), Window::Days(7));
        assert_eq!(Window::parse(" 14 "), Window::Days(14));
        assert_eq!(Window::parse("any"), Window::Unbounded);
        assert_eq!(Window::parse(""), Window::Unbounded);
        assert_eq!(Window::parse("3.5"), Window::Unbounded);
        assert_eq!(Window::Unbounded.num_days(), 0);
        assert_eq!(Window::Days(3).to_string(), "3");
        assert_eq!(Window::Unbounded.to_string(), "any");
    }

    #[test]
    fn test_window_is_half_open() {
        // R = 2020-04-10, W = 7: 04-03 out, 04-04 and 04-10 in, 04-11 out
        let dataset = Dataset::new(vec![
            record("a", vec![("2020-04-03", vec![("confirmed", 1)])], 0),
            record("b", vec![("2020-04-04", vec![("confirmed", 1)])], 0),
            record("c", vec![("2020-04-10", vec![("confirmed", 1)])], 0),
            record("d", vec![("2020-04-11", vec![("confirmed", 1)])], 0),
        ]);

        let view = aggregate(&dataset, day("2020-04-10"), Window::Days(7), &SourceFilter::new());

        assert_eq!(view["a"], 0);
        assert_eq!(view["b"], 1);
        assert_eq!(view["c"], 1);
        assert_eq!(view["d"], 0);
    }

    #[test]
    fn test_unbounded_counts_from_earliest_day() {
        let view = aggregate(&scenario(), day("2020-04-05"), Window::Unbounded, &SourceFilter::new());
        assert_eq!(view["2000"], 6);

        // Nothing after the reference day
        let view = aggregate(&scenario(), day("2020-04-04"), Window::Unbounded, &SourceFilter::new());
        assert_eq!(view["2000"], 3);
    }

    #[test]
    fn test_empty_filter_equals_all_sources_enabled() {
        let dataset = Dataset::new(vec![
            record("2000", vec![("2020-04-05", vec![("confirmed", 2), ("probable", 1)])], 0),
            record("2001", vec![("2020-04-04", vec![("overseas", 5)])], 0),
        ]);
        let all: SourceFilter = discover_sources(&dataset)
            .into_iter()
            .map(|s| (s, true))
            .collect();

        let reference = day("2020-04-05");
        let implicit = aggregate(&dataset, reference, Window::Days(5), &SourceFilter::new());
        let explicit = aggregate(&dataset, reference, Window::Days(5), &all);

        assert_eq!(implicit, explicit);
        assert_eq!(total_cases(&implicit), 8);
    }

    #[test]
    fn test_source_filter_excludes_false_and_unlisted() {
        let dataset = Dataset::new(vec![record(
            "2000",
            vec![("2020-04-05", vec![("confirmed", 2), ("probable", 1), ("overseas", 4)])],
            0,
        )]);
        let filter: SourceFilter = [("confirmed".to_string(), true), ("probable".to_string(), false)]
            .into_iter()
            .collect();

        let view = aggregate(&dataset, day("2020-04-05"), Window::Unbounded, &filter);

        // "overseas" is absent from a non-empty filter
        assert_eq!(view["2000"], 2);
    }

    #[test]
    fn test_bad_keys_and_empty_records() {
        let dataset = Dataset::new(vec![
            record("2000", vec![("not-a-day", vec![("confirmed", 50)]), ("2020-04-05", vec![("confirmed", 1)])], 0),
            record("2001", vec![], 0),
        ]);

        let view = aggregate(&dataset, day("2020-04-05"), Window::Unbounded, &SourceFilter::new());

        assert_eq!(view["2000"], 1);
        assert_eq!(view["2001"], 0);
    }

    #[test]
    fn test_duplicate_postcode_last_wins() {
        let dataset = Dataset::new(vec![
            record("2000", vec![("2020-04-05", vec![("confirmed", 9)])], 0),
            record("2000", vec![("2020-04-05", vec![("confirmed", 1)])], 0),
        ]);

        let view = aggregate(&dataset, day("2020-04-05"), Window::Unbounded, &SourceFilter::new());

        assert_eq!(view.len(), 1);
        assert_eq!(view["2000"], 1);
    }

    #[test]
    fn test_scenario_window_and_source() {
        let mut filter: SourceFilter = discover_sources(&scenario())
            .into_iter()
            .map(|s| (s, true))
            .collect();
        filter.insert("probable".to_string(), false);
        let reference = day("2020-04-05");

        assert_eq!(aggregate(&scenario(), reference, Window::Unbounded, &filter)["2000"], 5);
        assert_eq!(aggregate(&scenario(), reference, Window::Days(3), &filter)["2000"], 2);
    }

    #[test]
    fn test_counts_saturate_instead_of_overflowing() {
        let dataset = Dataset::new(vec![
            record(
                "2000",
                vec![
                    ("2020-04-01", vec![("a", u64::MAX)]),
                    ("2020-04-05", vec![("a", 1), ("b", u64::MAX)]),
                ],
                0,
            ),
            record("2001", vec![("2020-04-05", vec![("a", 1)])], 0),
        ]);

        let view = aggregate(&dataset, day("2020-04-05"), Window::Unbounded, &SourceFilter::new());

        assert_eq!(view["2000"], u64::MAX);
        assert_eq!(view["2001"], 1);
        assert_eq!(total_cases(&view), u64::MAX);
    }

    #[test]
    fn test_extreme_windows() {
        let reference = day("2020-04-05");
        let all = SourceFilter::new();

        // Past the representable range: everything up to the reference day
        for n in [100_000_000, i64::MAX] {
            assert_eq!(aggregate(&scenario(), reference, Window::Days(n), &all)["2000"], 6);
        }
        // Negative lengths select nothing
        for n in [-100_000_000, i64::MIN] {
            assert_eq!(aggregate(&scenario(), reference, Window::Days(n), &all)["2000"], 0);
        }
    }
}
