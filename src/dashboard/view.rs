use crate::dashboard::{BoxStats, Summary};
use crate::models::Dataset;
use serde::Serialize;
use std::fmt::Write;

const MAX_CELL_WIDTH: usize = 40;
const BAR_WIDTH: usize = 40;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarPoint {
    pub category: String,
    /// `None` when the category has no numeric value (serialised as null)
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxSeries {
    pub category: String,
    pub stats: Option<BoxStats>,
    pub values: Vec<f64>,
}

/// Renderer-agnostic chart description
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartSpec {
    Bar {
        title: String,
        y_label: String,
        points: Vec<BarPoint>,
    },
    Box {
        title: String,
        series: Vec<BoxSeries>,
    },
    Pie {
        title: String,
        slices: Vec<BarPoint>,
    },
}

impl ChartSpec {
    pub fn title(&self) -> &str {
        match self {
            ChartSpec::Bar { title, .. }
            | ChartSpec::Box { title, .. }
            | ChartSpec::Pie { title, .. } => title,
        }
    }
}

/// The four dashboard charts: listing count, price spread, mean price and
/// category share.
pub fn charts(summary: &Summary) -> Vec<ChartSpec> {
    let boxes = summary.box_stats();

    vec![
        ChartSpec::Bar {
            title: "Nombre d'annonces".to_string(),
            y_label: "count".to_string(),
            points: summary
                .counts
                .iter()
                .map(|(category, count)| BarPoint {
                    category: category.clone(),
                    value: Some(*count as f64),
                })
                .collect(),
        },
        ChartSpec::Box {
            title: "Distribution des prix".to_string(),
            series: summary
                .prices
                .iter()
                .map(|(category, values)| BoxSeries {
                    category: category.clone(),
                    stats: boxes.get(category).copied().flatten(),
                    values: values.clone(),
                })
                .collect(),
        },
        ChartSpec::Bar {
            title: "Prix moyen".to_string(),
            y_label: "prix".to_string(),
            points: summary
                .means
                .iter()
                .map(|(category, mean)| BarPoint {
                    category: category.clone(),
                    value: mean.is_finite().then_some(*mean),
                })
                .collect(),
        },
        ChartSpec::Pie {
            title: "Répartition des annonces".to_string(),
            slices: summary
                .shares
                .iter()
                .map(|(category, share)| BarPoint {
                    category: category.clone(),
                    value: Some(*share),
                })
                .collect(),
        },
    ]
}

fn clip(text: &str) -> String {
    if text.chars().count() <= MAX_CELL_WIDTH {
        text.to_string()
    } else {
        let mut clipped: String = text.chars().take(MAX_CELL_WIDTH - 1).collect();
        clipped.push('…');
        clipped
    }
}

/// Plain-text table of a dataset, with a provenance caption.
pub fn render_table(dataset: &Dataset, limit: Option<usize>) -> String {
    let header = ["categorie", "page", "nom", "prix", "adresse", "image"];
    let shown = limit.unwrap_or(dataset.len()).min(dataset.len());

    let rows: Vec<[String; 6]> = dataset.records[..shown]
        .iter()
        .map(|r| {
            [
                clip(&r.category),
                r.page.to_string(),
                clip(&r.name),
                clip(&r.price),
                clip(&r.address),
                clip(&r.image_url),
            ]
        })
        .collect();

    let mut widths = header.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "Source des données : {} ({} annonces)",
        dataset.source,
        dataset.len()
    );

    let line = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let header_cells = header.map(str::to_string);
    let _ = writeln!(out, "{}", line(&header_cells));
    let _ = writeln!(
        out,
        "{}",
        widths.map(|w| "-".repeat(w)).join("-+-")
    );
    for row in &rows {
        let _ = writeln!(out, "{}", line(row));
    }
    if shown < dataset.len() {
        let _ = writeln!(out, "… {} more rows", dataset.len() - shown);
    }

    out
}

fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 || !value.is_finite() {
        return String::new();
    }
    "#".repeat(((value / max) * BAR_WIDTH as f64).round() as usize)
}

/// Plain-text rendering of one chart
pub fn render_chart_text(chart: &ChartSpec) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {} ==", chart.title());

    match chart {
        ChartSpec::Bar { points, .. } | ChartSpec::Pie { slices: points, .. } => {
            let as_percent = matches!(chart, ChartSpec::Pie { .. });
            let max = points
                .iter()
                .filter_map(|p| p.value)
                .fold(0.0_f64, f64::max);
            let width = points.iter().map(|p| p.category.chars().count()).max().unwrap_or(0);

            for point in points {
                let label = match point.value {
                    Some(v) if as_percent => format!("{:.1}%", v * 100.0),
                    Some(v) => format!("{:.0}", v),
                    None => "n/a".to_string(),
                };
                let _ = writeln!(
                    out,
                    "{:<width$}  {:>12}  {}",
                    point.category,
                    label,
                    point.value.map(|v| bar(v, max)).unwrap_or_default(),
                    width = width
                );
            }
        }
        ChartSpec::Box { series, .. } => {
            for s in series {
                match s.stats {
                    Some(b) => {
                        let _ = writeln!(
                            out,
                            "{}: min {:.0} | q1 {:.0} | median {:.0} | q3 {:.0} | max {:.0} \
                             ({} prices)",
                            s.category,
                            b.min,
                            b.q1,
                            b.median,
                            b.q3,
                            b.max,
                            s.values.len()
                        );
                    }
                    None => {
                        let _ = writeln!(out, "{}: no numeric prices", s.category);
                    }
                }
            }
        }
    }

    out
}
