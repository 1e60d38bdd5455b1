//! Chart-ready data handed to a renderer.
//!
//! Controllers build these immutable values; a `ChartSink` only draws them
//! and reports clicks back as `ChartClick`s.

use anyhow::Result;
use serde::{Serialize, Serializer};
use std::fmt;
use std::io::Write;

use crate::domain::Category;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub const fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

impl Serialize for Rgba {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

pub mod palette {
    use super::Rgba;

    pub const ABOVE: Rgba = Rgba::new(239, 68, 68, 1.0);
    pub const BELOW: Rgba = Rgba::new(16, 185, 129, 1.0);
    pub const GOOD: Rgba = BELOW;
    pub const BAD: Rgba = ABOVE;
    pub const EFFICIENCY_LINE: Rgba = Rgba::new(59, 130, 246, 1.0);
    pub const BASELINE: Rgba = Rgba::new(253, 126, 20, 1.0);
    pub const AC: Rgba = Rgba::new(13, 110, 253, 1.0);
    pub const KITCHEN: Rgba = Rgba::new(255, 193, 7, 1.0);
    pub const LAUNDRY: Rgba = Rgba::new(25, 135, 84, 1.0);
}

pub fn category_color(category: Category) -> Rgba {
    match category {
        Category::Ac => palette::AC,
        Category::Kitchen => palette::KITCHEN,
        Category::Laundry => palette::LAUNDRY,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetKind {
    Bar,
    Line,
}

/// One series plus its per-element styling.
///
/// Per-element vectors are either empty (renderer default) or exactly as long
/// as `data`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    pub kind: DatasetKind,
    pub label: String,
    pub data: Vec<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub colors: Vec<Rgba>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<Rgba>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub point_radius: Vec<u8>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub point_border_width: Vec<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    pub dashed: bool,
    pub fill: bool,
}

impl Dataset {
    pub fn new(kind: DatasetKind, label: impl Into<String>, data: Vec<f64>) -> Self {
        Self {
            kind,
            label: label.into(),
            data,
            colors: Vec::new(),
            border_color: None,
            point_radius: Vec::new(),
            point_border_width: Vec::new(),
            stack: None,
            dashed: false,
            fill: false,
        }
    }

    /// Dashed "Last Month Avg" reference line of `len` copies of `value`.
    pub fn reference_line(value: f64, len: usize) -> Self {
        Self {
            border_color: Some(palette::BASELINE),
            dashed: true,
            ..Self::new(DatasetKind::Line, "Last Month Avg", vec![value; len])
        }
    }

    pub fn with_colors(mut self, colors: Vec<Rgba>) -> Self {
        self.colors = colors;
        self
    }

    pub fn with_border(mut self, color: Rgba) -> Self {
        self.border_color = Some(color);
        self
    }

    pub fn with_points(mut self, radius: Vec<u8>, border_width: Vec<u8>) -> Self {
        self.point_radius = radius;
        self.point_border_width = border_width;
        self
    }

    pub fn stacked(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    pub fn filled(mut self) -> Self {
        self.fill = true;
        self
    }
}

/// Horizontal marker drawn over the plot area.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HorizontalLine {
    pub label: String,
    pub value: f64,
    pub color: Rgba,
    pub dashed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub id: String,
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<HorizontalLine>,
}

impl ChartData {
    pub fn new(id: impl Into<String>, labels: Vec<String>) -> Self {
        Self {
            id: id.into(),
            labels,
            datasets: Vec::new(),
            annotations: Vec::new(),
        }
    }

    pub fn dataset(mut self, dataset: Dataset) -> Self {
        self.datasets.push(dataset);
        self
    }

    pub fn annotation(mut self, line: HorizontalLine) -> Self {
        self.annotations.push(line);
        self
    }
}

/// An element under the cursor when the user clicked a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartClick {
    pub dataset_index: usize,
    pub index: usize,
}

impl ChartClick {
    pub fn new(dataset_index: usize, index: usize) -> Self {
        Self { dataset_index, index }
    }

    /// A click on element `index` of the primary dataset.
    pub fn primary(index: usize) -> Self {
        Self::new(0, index)
    }
}

/// Index hit in the primary dataset, ignoring reference-line hits.
pub fn primary_index(clicks: &[ChartClick]) -> Option<usize> {
    clicks.iter().find(|c| c.dataset_index == 0).map(|c| c.index)
}

/// Index of the first hit in any dataset (stacked bars share an index).
pub fn any_index(clicks: &[ChartClick]) -> Option<usize> {
    clicks.first().map(|c| c.index)
}

pub trait ChartSink {
    fn render(&mut self, chart: &ChartData) -> Result<()>;
}

/// Writes each chart as one JSON line.
pub struct JsonLinesSink<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ChartSink for JsonLinesSink<W> {
    fn render(&mut self, chart: &ChartData) -> Result<()> {
        serde_json::to_writer(&mut self.out, chart)?;
        self.out.write_all(b"\n")?;
        Ok(())
    }
}
