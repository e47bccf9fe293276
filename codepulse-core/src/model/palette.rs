//! Language and task breakdowns
//!
//! Raw per-language counts become integer percentages of their own sum, each
//! with a display color.

use crate::types::Share;

/// Known language colors, keyed by the names exporters use.
const LANGUAGE_COLORS: &[(&str, &str)] = &[
    ("Java", "#b07219"),
    ("JavaScript", "#f7df1e"),
    ("TypeScript", "#3178c6"),
    ("React JSX", "#61dafb"),
    ("React TSX", "#61dafb"),
    ("Python", "#3776ab"),
    ("CSS", "#563d7c"),
    ("YAML", "#cb171e"),
    ("Markdown", "#083fa1"),
    ("JSON", "#292929"),
    ("HTML", "#e34c26"),
    ("Shell", "#89e051"),
    ("Go", "#00add8"),
    ("Rust", "#dea584"),
    ("properties", "#2b6cb0"),
    ("xml", "#0060ac"),
    ("Other", "#8888aa"),
];

/// Task categories shown for imports, which carry no task data of their own.
const IMPORT_TASKS: &[(&str, u32, &str)] = &[
    ("Code Generation", 45, "#00f5ff"),
    ("Feature Development", 25, "#00ff88"),
    ("Bug Fixing", 15, "#bf00ff"),
    ("Documentation", 10, "#ff6b00"),
    ("Refactoring", 5, "#ff0080"),
];

/// Color for a language at `index` in its source list.
///
/// Unknown names get a hue spread of 45 degrees per position, so distinct
/// unknown languages in one list stay distinguishable.
pub fn language_color(name: &str, index: usize) -> String {
    LANGUAGE_COLORS
        .iter()
        .find(|(known, _)| *known == name)
        .map(|(_, color)| color.to_string())
        .unwrap_or_else(|| format!("hsl({}, 70%, 50%)", (index * 45) % 360))
}

/// Build a language breakdown from raw `(name, count)` pairs.
///
/// Percentages always sum to exactly 100 for a non-empty list (largest
/// remainder rounding). An all-zero list is split evenly.
pub fn language_breakdown(entries: &[(String, f64)]) -> Vec<Share> {
    let values: Vec<f64> = entries.iter().map(|(_, v)| *v).collect();
    let percents = percentages(&values);

    entries
        .iter()
        .zip(percents)
        .enumerate()
        .map(|(i, ((name, _), value))| Share {
            name: name.clone(),
            value,
            color: language_color(name, i),
        })
        .collect()
}

/// Default task breakdown for imported data.
pub fn import_task_breakdown() -> Vec<Share> {
    IMPORT_TASKS
        .iter()
        .map(|(name, value, color)| Share {
            name: name.to_string(),
            value: *value,
            color: color.to_string(),
        })
        .collect()
}

/// Integer percentages of `values` summing to 100.
fn percentages(values: &[f64]) -> Vec<u32> {
    if values.is_empty() {
        return Vec::new();
    }

    let sanitized: Vec<f64> = values
        .iter()
        .map(|v| if v.is_finite() && *v > 0.0 { *v } else { 0.0 })
        .collect();
    let total: f64 = sanitized.iter().sum();
    let weights = if total > 0.0 {
        sanitized
    } else {
        vec![1.0; values.len()]
    };
    let total: f64 = weights.iter().sum();

    let exact: Vec<f64> = weights.iter().map(|w| w / total * 100.0).collect();
    let mut result: Vec<u32> = exact.iter().map(|e| e.floor() as u32).collect();
    let assigned: u32 = result.iter().sum();

    // Hand the leftover points to the largest fractional parts, earliest first.
    let mut order: Vec<usize> = (0..exact.len()).collect();
    order.sort_by(|&a, &b| {
        let fa = exact[a] - exact[a].floor();
        let fb = exact[b] - exact[b].floor();
        fb.total_cmp(&fa).then(a.cmp(&b))
    });
    for &i in order.iter().cycle().take(100u32.saturating_sub(assigned) as usize) {
        result[i] += 1;
    }

    result
}
