//! Categorical bar charts rendered as standalone SVG documents

use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};

use itertools::Itertools;

use crate::aggregate::{GroupTotal, SalesBreakdown};
use crate::config::ChartConfig;
use crate::error::Result;

const MARGIN_TOP: f64 = 50.0;
const MARGIN_RIGHT: f64 = 24.0;
const MARGIN_BOTTOM: f64 = 130.0;
const MARGIN_LEFT: f64 = 90.0;
const TICKS: usize = 5;

/// A bar chart of one value per category
#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub bars: Vec<(String, f64)>,
}

impl BarChart {
    /// Chart of summed sales per group, in the given group order
    #[must_use]
    pub fn from_groups<K: Display>(breakdown_title: &str, category: &str, groups: &[GroupTotal<K>]) -> Self {
        Self {
            title: breakdown_title.to_string(),
            x_label: category.to_string(),
            y_label: "Total Sales".to_string(),
            bars: groups
                .iter()
                .map(|g| (g.key.to_string(), g.total_sales))
                .collect(),
        }
    }

    /// Chart of a breakdown in its own order
    #[must_use]
    pub fn from_breakdown<K: Copy + PartialEq + Display>(breakdown: &SalesBreakdown<K>) -> Self {
        Self::from_groups(&breakdown.title, &breakdown.category, &breakdown.groups)
    }

    /// Render the chart as an SVG document
    #[must_use]
    pub fn to_svg(&self, config: &ChartConfig) -> String {
        let width = f64::from(config.width);
        let height = f64::from(config.height);
        let plot_width = (width - MARGIN_LEFT - MARGIN_RIGHT).max(1.0);
        let plot_height = (height - MARGIN_TOP - MARGIN_BOTTOM).max(1.0);
        let baseline = MARGIN_TOP + plot_height;

        let max_value = self.bars.iter().map(|(_, v)| *v).fold(0.0_f64, f64::max);
        let step = nice_step(max_value / TICKS as f64);
        #[allow(clippy::cast_precision_loss)]
        let axis_max = step * TICKS as f64;
        let scale = |value: f64| plot_height * (value.max(0.0) / axis_max);

        let mut parts = vec![
            format!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}" font-family="sans-serif">"#
            ),
            format!(r#"<rect width="{width}" height="{height}" fill="white"/>"#),
            format!(
                r#"<text x="{:.1}" y="28" font-size="18" text-anchor="middle">{}</text>"#,
                width / 2.0,
                escape(&self.title)
            ),
        ];

        for tick in 0..=TICKS {
            #[allow(clippy::cast_precision_loss)]
            let value = step * tick as f64;
            let y = baseline - scale(value);
            parts.push(format!(
                r##"<line x1="{MARGIN_LEFT}" y1="{y:.1}" x2="{:.1}" y2="{y:.1}" stroke="#dddddd"/>"##,
                MARGIN_LEFT + plot_width
            ));
            parts.push(format!(
                r#"<text x="{:.1}" y="{:.1}" font-size="11" text-anchor="end">{}</text>"#,
                MARGIN_LEFT - 6.0,
                y + 4.0,
                format_tick(value)
            ));
        }

        if !self.bars.is_empty() {
            #[allow(clippy::cast_precision_loss)]
            let slot = plot_width / self.bars.len() as f64;
            let bar_width = slot * 0.7;
            for (i, (label, value)) in self.bars.iter().enumerate() {
                #[allow(clippy::cast_precision_loss)]
                let center = MARGIN_LEFT + slot * (i as f64 + 0.5);
                let bar_height = scale(*value);
                parts.push(format!(
                    r#"<rect x="{:.1}" y="{:.1}" width="{bar_width:.1}" height="{bar_height:.1}" fill="{}"><title>{}: {value:.2}</title></rect>"#,
                    center - bar_width / 2.0,
                    baseline - bar_height,
                    escape(&config.bar_color),
                    escape(label)
                ));
                parts.push(format!(
                    r#"<text x="{center:.1}" y="{:.1}" font-size="11" text-anchor="end" transform="rotate(-40 {center:.1} {:.1})">{}</text>"#,
                    baseline + 14.0,
                    baseline + 14.0,
                    escape(label)
                ));
            }
        }

        parts.push(format!(
            r#"<line x1="{MARGIN_LEFT}" y1="{baseline:.1}" x2="{:.1}" y2="{baseline:.1}" stroke="black"/>"#,
            MARGIN_LEFT + plot_width
        ));
        parts.push(format!(
            r#"<line x1="{MARGIN_LEFT}" y1="{MARGIN_TOP}" x2="{MARGIN_LEFT}" y2="{baseline:.1}" stroke="black"/>"#
        ));
        parts.push(format!(
            r#"<text x="{:.1}" y="{:.1}" font-size="13" text-anchor="middle">{}</text>"#,
            MARGIN_LEFT + plot_width / 2.0,
            height - 12.0,
            escape(&self.x_label)
        ));
        parts.push(format!(
            r#"<text x="20" y="{:.1}" font-size="13" text-anchor="middle" transform="rotate(-90 20 {:.1})">{}</text>"#,
            MARGIN_TOP + plot_height / 2.0,
            MARGIN_TOP + plot_height / 2.0,
            escape(&self.y_label)
        ));
        parts.push("</svg>".to_string());

        parts.iter().join("\n")
    }

    /// Render and write the chart to `path`
    pub fn write_svg(&self, path: &Path, config: &ChartConfig) -> Result<PathBuf> {
        fs::write(path, self.to_svg(config))?;
        log::debug!("Wrote chart '{}' to {}", self.title, path.display());
        Ok(path.to_path_buf())
    }
}

/// Smallest of 1, 2, 5 or 10 times a power of ten that is at least `raw`
fn nice_step(raw: f64) -> f64 {
    if !raw.is_finite() || raw <= 0.0 {
        return 1.0;
    }
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let factor = [1.0, 2.0, 5.0, 10.0]
        .into_iter()
        .find(|f| normalized <= *f)
        .unwrap_or(10.0);
    factor * magnitude
}

fn format_tick(value: f64) -> String {
    if value >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("{:.0}k", value / 1_000.0)
    } else if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
