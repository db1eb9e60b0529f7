//! Configuration for the analysis pipeline.

use std::io::BufReader;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::util::safe_open_file;
use crate::error::{AnalysisError, Result};
use crate::filter::Expr;
use crate::models::{Lifestage, PremiumTier};

/// Environment variable naming an optional JSON configuration file
pub const CONFIG_ENV: &str = "LOYALTY_CONFIG";

/// Environment variable overriding the output directory
pub const OUTPUT_DIR_ENV: &str = "LOYALTY_OUTPUT_DIR";

/// A named segment to compute sales metrics for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentDefinition {
    /// Name shown in the report
    pub name: String,
    /// Predicate selecting the segment's records
    pub expr: Expr,
}

impl SegmentDefinition {
    #[must_use]
    pub fn new(name: impl Into<String>, expr: Expr) -> Self {
        Self {
            name: name.into(),
            expr,
        }
    }
}

/// Appearance of rendered bar charts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Fill colour of the bars (any SVG colour)
    pub bar_color: String,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 900,
            height: 540,
            bar_color: "#4c72b0".to_string(),
        }
    }
}

/// Configuration for an analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Rows scanned to discover the CSV column layout; `None` scans the whole file
    pub infer_records: Option<usize>,
    /// Rows shown in the preview of each source
    pub preview_rows: usize,
    /// Directory receiving charts and the JSON summary
    pub output_dir: PathBuf,
    /// Write one SVG bar chart per aggregate
    pub write_charts: bool,
    /// Write `summary.json`
    pub write_json: bool,
    /// Chart appearance
    pub chart: ChartConfig,
    /// Segments to compute sales metrics for
    pub segments: Vec<SegmentDefinition>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            infer_records: Some(10_000),
            preview_rows: 5,
            output_dir: PathBuf::from("report"),
            write_charts: true,
            write_json: true,
            chart: ChartConfig::default(),
            segments: default_segments(),
        }
    }
}

/// The two segments the standard report examines
#[must_use]
pub fn default_segments() -> Vec<SegmentDefinition> {
    vec![
        SegmentDefinition::new(
            "High-value (older singles/couples, mainstream)",
            Expr::lifestage_and_premium(Lifestage::OlderSinglesCouples, PremiumTier::Mainstream),
        ),
        SegmentDefinition::new("Premium customers", Expr::Premium(PremiumTier::Premium)),
    ]
}

impl AnalysisConfig {
    /// Load a configuration from a JSON file; absent fields take their defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let file = safe_open_file(path, "reading analysis configuration")?;
        let config: Self = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    /// Build the configuration from the environment
    ///
    /// Reads the file named by `LOYALTY_CONFIG` when set, then applies
    /// `LOYALTY_OUTPUT_DIR`.
    pub fn from_env() -> Result<Self> {
        let mut config = match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_json_file(Path::new(&path))?,
            None => Self::default(),
        };
        if let Some(dir) = std::env::var_os(OUTPUT_DIR_ENV) {
            config.output_dir = PathBuf::from(dir);
        }
        Ok(config)
    }

    /// Check the configuration for values the pipeline cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.chart.width == 0 || self.chart.height == 0 {
            return Err(AnalysisError::Config(format!(
                "chart dimensions must be positive, got {}x{}",
                self.chart.width, self.chart.height
            )));
        }
        if self.infer_records == Some(0) {
            return Err(AnalysisError::Config(
                "infer_records must be at least 1 when set".to_string(),
            ));
        }

        let mut seen = FxHashSet::default();
        for segment in &self.segments {
            if segment.name.trim().is_empty() {
                return Err(AnalysisError::Config("segment names must not be empty".to_string()));
            }
            if !seen.insert(segment.name.as_str()) {
                return Err(AnalysisError::Config(format!(
                    "segment '{}' is defined more than once",
                    segment.name
                )));
            }
        }
        Ok(())
    }
}
