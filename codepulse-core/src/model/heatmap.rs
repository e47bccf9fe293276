//! Day-of-week by hour heatmap
//!
//! The output always has exactly [`HEATMAP_CELLS`] cells, one per
//! (day, hour) pair in Sun..Sat by 0..23 order, whatever the input looks like.

use crate::import::RawHourly;
use crate::types::{HeatmapCell, HEATMAP_CELLS, HEATMAP_DAYS};

/// Weekend columns are scaled by this when the source only has per-hour
/// totals, on the assumption that AI-assisted coding is mostly work.
pub const WEEKEND_DAMPENING: f64 = 0.3;

type Grid = [[f64; 24]; 7];

/// Build a heatmap from an export's hourly distribution.
///
/// If any entry names a weekday, counts are bucketed per (day, hour) and
/// used as-is; entries without a day then count for every day. Otherwise
/// each hour's total is spread over all seven days and weekend columns are
/// dampened. Intensity is relative to the busiest bucket.
pub fn from_distribution(entries: &[RawHourly]) -> Vec<HeatmapCell> {
    let per_day = entries.iter().any(|e| e.weekday().is_some());
    let mut grid: Grid = [[0.0; 24]; 7];

    for entry in entries {
        let Some(hour) = entry.hour_of_day() else {
            continue;
        };
        let count = entry.count.unwrap_or(0.0);
        match entry.weekday() {
            Some(day) if per_day => {
                grid[day.num_days_from_sunday() as usize][hour] += count;
            }
            _ => {
                for row in grid.iter_mut() {
                    row[hour] += count;
                }
            }
        }
    }

    let max = grid
        .iter()
        .flat_map(|row| row.iter().copied())
        .fold(1.0_f64, f64::max);

    let mut cells = Vec::with_capacity(HEATMAP_CELLS);
    for (d, day) in HEATMAP_DAYS.iter().enumerate() {
        let weekend = d == 0 || d == 6;
        for hour in 0..24 {
            let intensity = grid[d][hour] / max;
            let shown = if weekend && !per_day {
                intensity * WEEKEND_DAMPENING
            } else {
                intensity
            };
            cells.push(HeatmapCell {
                day: *day,
                hour: hour as u8,
                intensity: shown,
                conversations: (intensity * 10.0).floor() as u32,
            });
        }
    }
    cells
}

/// Normalize an already-built heatmap to the full grid.
///
/// Missing cells become zero, the first cell wins for a repeated pair,
/// out-of-range hours are dropped and intensities are clamped to [0, 1].
pub fn complete(cells: &[HeatmapCell]) -> Vec<HeatmapCell> {
    let mut grid: [[Option<&HeatmapCell>; 24]; 7] = [[None; 24]; 7];
    for cell in cells {
        if cell.hour >= 24 {
            continue;
        }
        let slot = &mut grid[cell.day.num_days_from_sunday() as usize][cell.hour as usize];
        if slot.is_none() {
            *slot = Some(cell);
        }
    }

    let mut out = Vec::with_capacity(HEATMAP_CELLS);
    for (d, day) in HEATMAP_DAYS.iter().enumerate() {
        for hour in 0..24u8 {
            let (intensity, conversations) = match grid[d][hour as usize] {
                Some(cell) if cell.intensity.is_finite() => {
                    (cell.intensity.clamp(0.0, 1.0), cell.conversations)
                }
                Some(cell) => (0.0, cell.conversations),
                None => (0.0, 0),
            };
            out.push(HeatmapCell {
                day: *day,
                hour,
                intensity,
                conversations,
            });
        }
    }
    out
}

/// Hour with the highest combined intensity across all days.
///
/// `None` when the heatmap is entirely empty. Earlier hours win ties.
pub fn peak_hour(cells: &[HeatmapCell]) -> Option<u8> {
    let mut totals = [0.0_f64; 24];
    for cell in cells.iter().filter(|c| c.hour < 24) {
        totals[cell.hour as usize] += cell.intensity;
    }

    let mut best: Option<(usize, f64)> = None;
    for (hour, total) in totals.iter().copied().enumerate() {
        if total > best.map_or(0.0, |(_, t)| t) {
            best = Some((hour, total));
        }
    }
    best.map(|(hour, _)| hour as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use std::collections::HashSet;

    fn hourly(hour: i64, count: f64, day: Option<&str>) -> RawHourly {
        RawHourly {
            hour: Some(hour),
            count: Some(count),
            day: day.map(|d| serde_json::Value::String(d.to_string())),
        }
    }

    fn cell<'a>(cells: &'a [HeatmapCell], day: Weekday, hour: u8) -> &'a HeatmapCell {
        cells
            .iter()
            .find(|c| c.day == day && c.hour == hour)
            .expect("cell present")
    }

    #[test]
    fn test_empty_distribution_has_full_grid() {
        let cells = from_distribution(&[]);
        assert_eq!(cells.len(), HEATMAP_CELLS);
        let distinct: HashSet<_> = cells.iter().map(|c| (c.day, c.hour)).collect();
        assert_eq!(distinct.len(), HEATMAP_CELLS);
        assert!(cells.iter().all(|c| c.intensity == 0.0));
    }

    #[test]
    fn test_hour_totals_dampened_on_weekends() {
        let cells = from_distribution(&[hourly(14, 20.0, None), hourly(9, 10.0, None)]);

        let mon = cell(&cells, Weekday::Mon, 14);
        assert_eq!(mon.intensity, 1.0);
        assert_eq!(mon.conversations, 10);

        let sat = cell(&cells, Weekday::Sat, 14);
        assert!((sat.intensity - 0.3).abs() < 1e-9);
        assert_eq!(sat.conversations, 10);

        assert_eq!(cell(&cells, Weekday::Tue, 9).intensity, 0.5);
        assert_eq!(cell(&cells, Weekday::Tue, 3).intensity, 0.0);
    }

    #[test]
    fn test_per_day_distribution_not_dampened() {
        let cells = from_distribution(&[hourly(10, 4.0, Some("Sun")), hourly(10, 8.0, Some("Mon"))]);
        assert_eq!(cell(&cells, Weekday::Sun, 10).intensity, 0.5);
        assert_eq!(cell(&cells, Weekday::Mon, 10).intensity, 1.0);
        assert_eq!(cell(&cells, Weekday::Tue, 10).intensity, 0.0);
    }

    #[test]
    fn test_small_counts_use_unit_denominator() {
        let cells = from_distribution(&[hourly(8, 0.5, None)]);
        assert_eq!(cell(&cells, Weekday::Wed, 8).intensity, 0.5);
    }

    #[test]
    fn test_out_of_range_hours_ignored() {
        let cells = from_distribution(&[hourly(25, 100.0, None), hourly(-1, 100.0, None)]);
        assert_eq!(cells.len(), HEATMAP_CELLS);
        assert!(cells.iter().all(|c| c.intensity == 0.0));
    }

    #[test]
    fn test_complete_fills_missing_cells() {
        let partial = vec![HeatmapCell {
            day: Weekday::Fri,
            hour: 11,
            intensity: 1.7,
            conversations: 17,
        }];
        let cells = complete(&partial);
        assert_eq!(cells.len(), HEATMAP_CELLS);
        assert_eq!(cell(&cells, Weekday::Fri, 11).intensity, 1.0);
        assert_eq!(cell(&cells, Weekday::Fri, 12).intensity, 0.0);
    }

    #[test]
    fn test_peak_hour() {
        let cells = from_distribution(&[hourly(14, 20.0, None), hourly(9, 10.0, None)]);
        assert_eq!(peak_hour(&cells), Some(14));
        assert_eq!(peak_hour(&from_distribution(&[])), None);
    }
}
