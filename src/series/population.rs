use crate::errors::{AppError, AppResult};
use crate::models::{CenturyRange, EventEntry, PopulationPoint, PopulationRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Dense population series over a century range plus its numbered events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopulationSeries {
    pub range: CenturyRange,
    pub points: Vec<PopulationPoint>,
    pub events: Vec<EventEntry>,
}

impl PopulationSeries {
    /// False when no population value fell inside the range; every point is then null.
    pub fn has_anchors(&self) -> bool {
        self.points.iter().any(|point| point.population.is_some())
    }

    pub fn max_population(&self) -> Option<f64> {
        self.points
            .iter()
            .filter_map(|point| point.population)
            .fold(None, |max, value| match max {
                Some(current) if current >= value => Some(current),
                _ => Some(value),
            })
    }

    pub fn legend_lines(&self) -> Vec<String> {
        self.events
            .iter()
            .map(|entry| format!("• {}: {}", entry.event_id, entry.text))
            .collect()
    }
}

/// Builds the dense, interpolated population series for `range`.
///
/// Records outside the range are dropped before anything else, so they
/// neither anchor interpolation nor contribute events. Event ids follow
/// ascending century, then input order within a century.
pub fn reconcile(records: &[PopulationRecord], range: CenturyRange) -> AppResult<PopulationSeries> {
    let in_range: Vec<&PopulationRecord> = records
        .iter()
        .filter(|record| range.contains(record.century))
        .collect();
    let excluded = records.len() - in_range.len();
    if excluded > 0 {
        tracing::debug!(
            excluded,
            low = range.low(),
            high = range.high(),
            "population records outside the display range were dropped"
        );
    }

    let anchors = collect_anchors(&in_range, range)?;
    let populations = interpolate(&anchors);

    let mut points: Vec<PopulationPoint> = range
        .centuries()
        .zip(populations)
        .map(|(century, population)| PopulationPoint {
            century,
            population,
            event_id: None,
        })
        .collect();

    let mut events = extract_events(&in_range);
    for entry in &mut events {
        let Some(offset) = range.offset_of(entry.century) else {
            continue;
        };
        let point = &mut points[offset];
        // Events are in ascending id order, so the first one seen wins.
        if point.event_id.is_none() {
            point.event_id = Some(entry.event_id);
        }
        entry.population = point.population;
    }

    let series = PopulationSeries { range, points, events };
    if !series.has_anchors() {
        tracing::warn!(
            low = range.low(),
            high = range.high(),
            "no population samples in range; series is entirely null"
        );
    }
    Ok(series)
}

fn collect_anchors(records: &[&PopulationRecord], range: CenturyRange) -> AppResult<Vec<Option<f64>>> {
    let mut anchors = vec![None; range.len()];
    for record in records {
        let Some(value) = record.population else {
            continue;
        };
        if !value.is_finite() {
            return Err(AppError::InvalidPopulationSample {
                century: record.century,
                value,
            });
        }
        let Some(offset) = range.offset_of(record.century) else {
            continue;
        };
        if anchors[offset].is_some() {
            return Err(AppError::DuplicatePopulationSample {
                century: record.century,
            });
        }
        anchors[offset] = Some(value);
    }
    Ok(anchors)
}

/// Linear interpolation between consecutive known values. Leading and
/// trailing gaps stay `None`; there is no extrapolation.
fn interpolate(samples: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut output = samples.to_vec();
    let mut previous: Option<(usize, f64)> = None;

    for (index, sample) in samples.iter().enumerate() {
        let Some(value) = *sample else {
            continue;
        };
        if let Some((start, start_value)) = previous {
            let span = (index - start) as f64;
            for gap in start + 1..index {
                let fraction = (gap - start) as f64 / span;
                output[gap] = Some(start_value + (value - start_value) * fraction);
            }
        }
        previous = Some((index, value));
    }

    output
}

fn extract_events(records: &[&PopulationRecord]) -> Vec<EventEntry> {
    let mut tagged: Vec<(i32, &str)> = records
        .iter()
        .filter_map(|record| record.event_text().map(|text| (record.century, text)))
        .collect();
    // Stable sort keeps input order among events sharing a century.
    tagged.sort_by_key(|(century, _)| *century);

    let mut seen = HashSet::new();
    tagged
        .into_iter()
        .filter(|entry| seen.insert(*entry))
        .zip(1u32..)
        .map(|((century, text), event_id)| EventEntry {
            event_id,
            century,
            text: text.to_string(),
            population: None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{interpolate, reconcile};
    use crate::errors::AppError;
    use crate::models::{CenturyRange, PopulationRecord};

    fn range(low: i32, high: i32) -> CenturyRange {
        CenturyRange::new(low, high).expect("range")
    }

    fn populations(records: &[PopulationRecord], low: i32, high: i32) -> Vec<Option<f64>> {
        reconcile(records, range(low, high))
            .expect("reconcile")
            .points
            .iter()
            .map(|point| point.population)
            .collect()
    }

    #[test]
    fn emits_one_point_per_century_in_order() {
        let records = vec![
            PopulationRecord::population(3, 10.0),
            PopulationRecord::population(-5, 40.0),
        ];
        let series = reconcile(&records, range(-8, 21)).expect("reconcile");
        assert_eq!(series.points.len(), 30);
        let centuries: Vec<i32> = series.points.iter().map(|point| point.century).collect();
        assert_eq!(centuries, (-8..=21).collect::<Vec<_>>());
    }

    #[test]
    fn interpolates_linearly_between_anchors() {
        let records = vec![
            PopulationRecord::population(0, 100.0),
            PopulationRecord::population(4, 500.0),
        ];
        assert_eq!(
            populations(&records, 0, 4),
            vec![Some(100.0), Some(200.0), Some(300.0), Some(400.0), Some(500.0)]
        );
    }

    #[test]
    fn interpolates_each_segment_independently() {
        let records = vec![
            PopulationRecord::population(2, 10.0),
            PopulationRecord::population(0, 0.0),
            PopulationRecord::population(5, 40.0),
        ];
        assert_eq!(
            populations(&records, 0, 5),
            vec![Some(0.0), Some(5.0), Some(10.0), Some(20.0), Some(30.0), Some(40.0)]
        );
    }

    #[test]
    fn leaves_boundaries_null_without_extrapolating() {
        let records = vec![PopulationRecord::population(2, 50.0)];
        assert_eq!(populations(&records, 0, 4), vec![None, None, Some(50.0), None, None]);
    }

    #[test]
    fn interpolate_handles_adjacent_anchors() {
        assert_eq!(interpolate(&[Some(1.0), Some(2.0)]), vec![Some(1.0), Some(2.0)]);
        assert_eq!(interpolate(&[None, None]), vec![None, None]);
    }

    #[test]
    fn anchors_outside_range_are_excluded() {
        let records = vec![
            PopulationRecord::population(-2, 1_000.0),
            PopulationRecord::population(1, 100.0),
            PopulationRecord::population(3, 300.0),
            PopulationRecord::population(9, 9_000.0),
        ];
        assert_eq!(populations(&records, 0, 4), vec![None, Some(100.0), Some(200.0), Some(300.0), None]);
    }

    #[test]
    fn numbers_events_by_ascending_century() {
        let records = vec![
            PopulationRecord::event(5, "Sack of Rome"),
            PopulationRecord::event(1, "Great Fire"),
            PopulationRecord::event(3, "Capital moves"),
        ];
        let series = reconcile(&records, range(0, 6)).expect("reconcile");
        let ids: Vec<(u32, i32)> = series
            .events
            .iter()
            .map(|entry| (entry.event_id, entry.century))
            .collect();
        assert_eq!(ids, vec![(1, 1), (2, 3), (3, 5)]);
        assert_eq!(series.events[0].text, "Great Fire");
    }

    #[test]
    fn reattaches_event_ids_to_matching_points_only() {
        let records = vec![
            PopulationRecord::population(0, 100.0),
            PopulationRecord::population(4, 500.0).with_event("Plague"),
            PopulationRecord::event(2, "Siege"),
        ];
        let series = reconcile(&records, range(0, 4)).expect("reconcile");
        let tagged: Vec<(i32, Option<u32>)> = series
            .points
            .iter()
            .map(|point| (point.century, point.event_id))
            .collect();
        assert_eq!(
            tagged,
            vec![(0, None), (1, None), (2, Some(1)), (3, None), (4, Some(2))]
        );
        assert_eq!(series.events[0].population, Some(300.0));
        assert_eq!(series.events[1].population, Some(500.0));
    }

    #[test]
    fn separate_event_rows_do_not_duplicate_points() {
        let records = vec![
            PopulationRecord::population(1, 10.0),
            PopulationRecord::event(1, "Founding"),
            PopulationRecord::event(1, "Founding"),
            PopulationRecord::event(1, "  "),
        ];
        let series = reconcile(&records, range(1, 2)).expect("reconcile");
        assert_eq!(series.points.len(), 2);
        assert_eq!(series.events.len(), 1);
        assert_eq!(series.points[0].event_id, Some(1));
    }

    #[test]
    fn distinct_events_in_one_century_keep_input_order() {
        let records = vec![
            PopulationRecord::event(2, "Second"),
            PopulationRecord::event(1, "Earlier"),
            PopulationRecord::event(2, "Third"),
        ];
        let series = reconcile(&records, range(1, 2)).expect("reconcile");
        let texts: Vec<&str> = series.events.iter().map(|entry| entry.text.as_str()).collect();
        assert_eq!(texts, vec!["Earlier", "Second", "Third"]);
        assert_eq!(series.points[1].event_id, Some(2));
    }

    #[test]
    fn events_outside_range_are_not_numbered() {
        let records = vec![
            PopulationRecord::event(22, "Future"),
            PopulationRecord::event(-9, "Legend"),
            PopulationRecord::event(10, "Kept"),
        ];
        let series = reconcile(&records, range(-8, 21)).expect("reconcile");
        assert_eq!(series.events.len(), 1);
        assert_eq!(series.events[0].event_id, 1);
        assert_eq!(series.events[0].century, 10);
    }

    #[test]
    fn rejects_duplicate_population_samples() {
        let records = vec![
            PopulationRecord::population(3, 10.0),
            PopulationRecord::population(3, 20.0),
        ];
        let error = reconcile(&records, range(0, 5)).expect_err("duplicate");
        assert!(matches!(error, AppError::DuplicatePopulationSample { century: 3 }));
    }

    #[test]
    fn duplicate_outside_range_is_ignored() {
        let records = vec![
            PopulationRecord::population(30, 10.0),
            PopulationRecord::population(30, 20.0),
        ];
        assert!(reconcile(&records, range(0, 5)).is_ok());
    }

    #[test]
    fn rejects_non_finite_population() {
        let records = vec![PopulationRecord::population(1, f64::NAN)];
        let error = reconcile(&records, range(0, 5)).expect_err("nan");
        assert!(matches!(error, AppError::InvalidPopulationSample { century: 1, .. }));
    }

    #[test]
    fn empty_input_is_a_valid_all_null_series() {
        let series = reconcile(&[], range(-1, 1)).expect("reconcile");
        assert!(!series.has_anchors());
        assert!(series.points.iter().all(|point| point.population.is_none()));
        assert_eq!(series.max_population(), None);
    }

    #[test]
    fn reconcile_is_repeatable() {
        let records = vec![
            PopulationRecord::population(-8, 15_000.0),
            PopulationRecord::population(1, 450_000.0).with_event("Augustus"),
            PopulationRecord::population(2, 1_000_000.0),
            PopulationRecord::event(5, "Fall of the Western Empire"),
            PopulationRecord::population(6, 50_000.0),
        ];
        let first = reconcile(&records, range(-8, 21)).expect("first");
        let second = reconcile(&records, range(-8, 21)).expect("second");
        assert_eq!(first, second);
    }

    #[test]
    fn legend_and_max_follow_series() {
        let records = vec![
            PopulationRecord::population(0, 100.0).with_event("A"),
            PopulationRecord::population(2, 300.0),
            PopulationRecord::event(1, "B"),
        ];
        let series = reconcile(&records, range(0, 2)).expect("reconcile");
        assert_eq!(series.legend_lines(), vec!["• 1: A".to_string(), "• 2: B".to_string()]);
        assert_eq!(series.max_population(), Some(300.0));
    }
}
