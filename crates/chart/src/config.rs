//! The subset of Chart.js configuration the raster renderer understands.

use crate::ChartError;
use folio_types::Color;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    Line,
    Pie,
    Doughnut,
}

impl ChartKind {
    fn parse(name: &str) -> Result<Self, ChartError> {
        match name.to_ascii_lowercase().as_str() {
            "bar" => Ok(ChartKind::Bar),
            "line" => Ok(ChartKind::Line),
            "pie" => Ok(ChartKind::Pie),
            "doughnut" => Ok(ChartKind::Doughnut),
            other => Err(ChartError::UnsupportedType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub label: Option<String>,
    /// Missing points (`null`) are kept as gaps.
    pub values: Vec<Option<f64>>,
    /// One color per dataset or one per point.
    pub fill: Vec<Color>,
    pub stroke: Option<Color>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ColorSpec {
    One(String),
    Many(Vec<String>),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDataset {
    label: Option<String>,
    #[serde(default)]
    data: Vec<Option<f64>>,
    background_color: Option<ColorSpec>,
    border_color: Option<ColorSpec>,
}

#[derive(Deserialize)]
struct RawData {
    #[serde(default)]
    labels: Vec<Value>,
    #[serde(default)]
    datasets: Vec<RawDataset>,
}

#[derive(Deserialize)]
struct RawConfig {
    #[serde(rename = "type")]
    kind: String,
    data: RawData,
}

/// Accepts `#hex`, `transparent`, `rgb(r, g, b)`, `rgba(r, g, b, a)` and a
/// handful of named colours.
pub(crate) fn parse_css_color(s: &str) -> Option<Color> {
    if let Ok(color) = Color::parse(s) {
        return Some(color);
    }
    let s = s.trim();
    if let Some(color) = named_color(s) {
        return Some(color);
    }
    let inner = s
        .strip_prefix("rgba(")
        .or_else(|| s.strip_prefix("rgb("))?
        .strip_suffix(')')?;
    let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
    if parts.len() < 3 {
        return None;
    }
    let channel = |p: &str| p.parse::<f32>().ok().map(|v| v.clamp(0.0, 255.0).round() as u8);
    let mut color = Color::rgb(channel(parts[0])?, channel(parts[1])?, channel(parts[2])?);
    if let Some(alpha) = parts.get(3) {
        color.a = alpha.parse::<f32>().ok()?.clamp(0.0, 1.0);
    }
    Some(color)
}

fn named_color(name: &str) -> Option<Color> {
    let color = match name.to_ascii_lowercase().as_str() {
        "white" => Color::rgb(255, 255, 255),
        "black" => Color::rgb(0, 0, 0),
        "red" => Color::rgb(255, 0, 0),
        "green" => Color::rgb(0, 128, 0),
        "blue" => Color::rgb(0, 0, 255),
        "gray" | "grey" => Color::rgb(128, 128, 128),
        _ => return None,
    };
    Some(color)
}

fn colors(spec: Option<ColorSpec>) -> Vec<Color> {
    match spec {
        None => Vec::new(),
        Some(ColorSpec::One(s)) => parse_css_color(&s).into_iter().collect(),
        Some(ColorSpec::Many(list)) => list.iter().filter_map(|s| parse_css_color(s)).collect(),
    }
}

fn label_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl ChartSpec {
    pub fn from_config(config: &Value) -> Result<Self, ChartError> {
        let raw = RawConfig::deserialize(config).map_err(|e| ChartError::InvalidConfig(e.to_string()))?;
        let kind = ChartKind::parse(&raw.kind)?;
        if raw.data.datasets.is_empty() {
            return Err(ChartError::InvalidConfig("chart has no datasets".to_string()));
        }

        let datasets = raw
            .data
            .datasets
            .into_iter()
            .map(|d| Dataset {
                label: d.label,
                values: d.data,
                fill: colors(d.background_color),
                stroke: colors(d.border_color).into_iter().next(),
            })
            .collect();

        Ok(Self {
            kind,
            labels: raw.data.labels.iter().map(label_text).collect(),
            datasets,
        })
    }

    /// Number of categories: the longer of the labels and the widest dataset.
    pub fn category_count(&self) -> usize {
        let widest = self.datasets.iter().map(|d| d.values.len()).max().unwrap_or(0);
        widest.max(self.labels.len())
    }

    /// Largest value across all datasets, never below zero.
    pub fn max_value(&self) -> f64 {
        self.datasets
            .iter()
            .flat_map(|d| d.values.iter().flatten())
            .copied()
            .filter(|v| v.is_finite())
            .fold(0.0, f64::max)
    }
}
