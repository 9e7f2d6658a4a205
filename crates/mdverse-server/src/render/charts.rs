// SPDX-License-Identifier: Apache-2.0

//! Stacked bar charts of yearly counts, one layer per data repository.

use mdverse_model::{format_thousands, YearlyCounts};
use std::collections::BTreeSet;
use svg::node::element::{Element, Group, Line, Rectangle, Text};
use svg::{Document, Node};

const WIDTH: f32 = 900.0;
const HEIGHT: f32 = 460.0;
const PLOT_LEFT: f32 = 90.0;
const PLOT_RIGHT: f32 = WIDTH - 30.0;
const PLOT_TOP: f32 = 60.0;
const PLOT_BOTTOM: f32 = HEIGHT - 70.0;
const Y_TICKS: u64 = 5;

/// Catalog origin name, display label and colour, in stacking order.
pub const REPOSITORY_SERIES: [(&str, &str, &str); 3] = [
    ("zenodo", "Zenodo", "#66c2a5"),
    ("osf", "OSF", "#fc8d62"),
    ("figshare", "Figshare", "#8da0cb"),
];

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub label: String,
    pub color: String,
    pub counts: YearlyCounts,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<ChartSeries>,
}

impl ChartSpec {
    /// Years present in any series, ascending.
    #[must_use]
    pub fn years(&self) -> Vec<i32> {
        self.series
            .iter()
            .flat_map(|s| s.counts.keys().copied())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Stack height per year; a year missing from a series counts as zero.
    #[must_use]
    pub fn year_total(&self, year: i32) -> u64 {
        self.series
            .iter()
            .map(|s| s.counts.get(&year).copied().unwrap_or(0))
            .sum()
    }
}

/// Smallest 1, 2 or 5 times a power of ten that is at least `max`.
fn nice_ceiling(max: u64) -> u64 {
    if max == 0 {
        return 1;
    }
    let mut magnitude = 1_u64;
    loop {
        for step in [1, 2, 5] {
            let candidate = step * magnitude;
            if candidate >= max {
                return candidate;
            }
        }
        magnitude = magnitude.saturating_mul(10);
        if magnitude == u64::MAX {
            return max;
        }
    }
}

fn label(content: impl Into<String>, x: f32, y: f32, size: u32) -> Text {
    Text::new(content.into())
        .set("x", x)
        .set("y", y)
        .set("font-family", "sans-serif")
        .set("font-size", size)
        .set("fill", "#1f2937")
}

fn tooltip(content: String) -> Element {
    let mut title = Element::new("title");
    title.append(svg::node::Text::new(content));
    title
}

#[must_use]
pub fn stacked_bar_chart(spec: &ChartSpec) -> String {
    let years = spec.years();
    let max_total = years
        .iter()
        .map(|y| spec.year_total(*y))
        .max()
        .unwrap_or(0);
    let y_max = nice_ceiling(max_total.max(Y_TICKS));
    let plot_height = PLOT_BOTTOM - PLOT_TOP;
    let plot_width = PLOT_RIGHT - PLOT_LEFT;
    let scale = |value: u64| value as f32 / y_max as f32 * plot_height;

    let mut doc = Document::new()
        .set("viewBox", (0, 0, WIDTH, HEIGHT))
        .set("width", WIDTH)
        .set("height", HEIGHT)
        .set("role", "img")
        .add(
            Rectangle::new()
                .set("x", 0)
                .set("y", 0)
                .set("width", WIDTH)
                .set("height", HEIGHT)
                .set("fill", "#ffffff"),
        )
        .add(label(spec.title.clone(), PLOT_LEFT, 30.0, 18).set("font-weight", "bold"));

    for tick in 0..=Y_TICKS {
        let value = y_max / Y_TICKS * tick;
        let y = PLOT_BOTTOM - scale(value);
        doc = doc
            .add(
                Line::new()
                    .set("x1", PLOT_LEFT)
                    .set("y1", y)
                    .set("x2", PLOT_RIGHT)
                    .set("y2", y)
                    .set("stroke", "#e5e7eb")
                    .set("stroke-width", 1),
            )
            .add(
                label(format_thousands(value), PLOT_LEFT - 8.0, y + 4.0, 11)
                    .set("text-anchor", "end"),
            );
    }

    if years.is_empty() {
        doc = doc.add(
            label("No data", PLOT_LEFT + plot_width / 2.0, PLOT_TOP + plot_height / 2.0, 14)
                .set("text-anchor", "middle"),
        );
    }

    let slot = plot_width / years.len().max(1) as f32;
    let bar_width = slot * 0.8;
    for (idx, year) in years.iter().enumerate() {
        let x = PLOT_LEFT + slot * idx as f32 + (slot - bar_width) / 2.0;
        let mut stacked = 0_u64;
        let mut bar = Group::new().set("class", "bar");
        for series in &spec.series {
            let count = series.counts.get(year).copied().unwrap_or(0);
            if count == 0 {
                continue;
            }
            let y_top = PLOT_BOTTOM - scale(stacked + count);
            bar = bar.add(
                Rectangle::new()
                    .set("x", x)
                    .set("y", y_top)
                    .set("width", bar_width)
                    .set("height", scale(count))
                    .set("fill", series.color.as_str())
                    .add(tooltip(format!(
                        "{} {}: {}",
                        series.label,
                        year,
                        format_thousands(count)
                    ))),
            );
            stacked += count;
        }
        doc = doc.add(bar).add(
            label(year.to_string(), x + bar_width / 2.0, PLOT_BOTTOM + 18.0, 11)
                .set("text-anchor", "middle"),
        );
    }

    doc = doc
        .add(
            Line::new()
                .set("x1", PLOT_LEFT)
                .set("y1", PLOT_BOTTOM)
                .set("x2", PLOT_RIGHT)
                .set("y2", PLOT_BOTTOM)
                .set("stroke", "#374151")
                .set("stroke-width", 1),
        )
        .add(
            label(
                spec.x_label.clone(),
                PLOT_LEFT + plot_width / 2.0,
                HEIGHT - 25.0,
                13,
            )
            .set("text-anchor", "middle"),
        )
        .add(
            label(spec.y_label.clone(), 0.0, 0.0, 13)
                .set("text-anchor", "middle")
                .set(
                    "transform",
                    format!("translate(24 {}) rotate(-90)", PLOT_TOP + plot_height / 2.0),
                ),
        );

    for (idx, series) in spec.series.iter().enumerate() {
        let y = PLOT_TOP + 8.0 + 20.0 * idx as f32;
        doc = doc
            .add(
                Rectangle::new()
                    .set("x", PLOT_LEFT + 10.0)
                    .set("y", y)
                    .set("width", 14)
                    .set("height", 14)
                    .set("fill", series.color.as_str()),
            )
            .add(label(series.label.clone(), PLOT_LEFT + 30.0, y + 12.0, 12));
    }

    doc.to_string()
}

/// One series per known repository, in `REPOSITORY_SERIES` order.
#[must_use]
pub fn repository_chart(
    title: &str,
    y_label: &str,
    counts: impl Fn(&str) -> YearlyCounts,
) -> ChartSpec {
    ChartSpec {
        title: title.to_string(),
        x_label: "Year".to_string(),
        y_label: y_label.to_string(),
        series: REPOSITORY_SERIES
            .iter()
            .map(|(origin, label, color)| ChartSeries {
                label: (*label).to_string(),
                color: (*color).to_string(),
                counts: counts(origin),
            })
            .collect(),
    }
}
