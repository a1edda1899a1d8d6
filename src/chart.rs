//! Chart Builder - turns a selected KPI into a bar chart description
//!
//! Bar styling is decided by `STYLE_RULES`, an ordered table evaluated top to
//! bottom against the lower-cased KPI name; the first match wins and the last
//! rule matches everything. Reference lines come from `OVERLAY_RULES`, where
//! every matching entry contributes.
//!
//! Building never fails: a missing selection or unknown KPI produces an empty
//! chart with a placeholder description.

use crate::descriptions::DescriptionTable;
use crate::loader::{KpiRecord, KpiTable, SCENARIOS};
use serde::Serialize;
use tracing::debug;

pub const NO_DATA_FOUND: &str = "no data found";

pub const X_AXIS_TITLE: &str = "Scenario's";

pub const POSITIVE_GREEN: &str = "#317336";
pub const NEGATIVE_RED: &str = "#c00000";
pub const UNKNOWN_GROUP_COLOR: &str = "gray";

const GROUP_COLORS: [(&str, &str); 3] = [
    ("Sustainability", "#2E6F40"),
    ("Feasibility", "#ff7f0e"),
    ("Financial (quantitative)", "#1f77b4"),
];

pub fn group_color(group: &str) -> &'static str {
    GROUP_COLORS
        .iter()
        .find(|(name, _)| *name == group)
        .map(|(_, color)| *color)
        .unwrap_or(UNKNOWN_GROUP_COLOR)
}

/// Case-insensitive test on a KPI name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameMatcher {
    Contains(&'static str),
    StartsWith(&'static str),
    Any,
}

impl NameMatcher {
    pub fn matches(&self, kpi_name: &str) -> bool {
        let name = kpi_name.to_lowercase();
        match self {
            NameMatcher::Contains(needle) => name.contains(needle),
            NameMatcher::StartsWith(prefix) => name.starts_with(prefix),
            NameMatcher::Any => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarPaint {
    /// One color per bar depending on its sign; missing values count as negative
    BySign {
        non_negative: &'static str,
        negative: &'static str,
    },
    Fixed(&'static str),
    ByGroup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueFormat {
    Plain,
    Percent,
}

impl ValueFormat {
    fn tick_format(&self) -> Option<String> {
        match self {
            ValueFormat::Plain => None,
            ValueFormat::Percent => Some(".0%".to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleRule {
    pub name: &'static str,
    pub matcher: NameMatcher,
    pub paint: BarPaint,
    pub format: ValueFormat,
}

pub static STYLE_RULES: [StyleRule; 4] = [
    StyleRule {
        name: "profit",
        matcher: NameMatcher::Contains("profit"),
        paint: BarPaint::BySign {
            non_negative: POSITIVE_GREEN,
            negative: NEGATIVE_RED,
        },
        format: ValueFormat::Percent,
    },
    StyleRule {
        name: "total-cost",
        matcher: NameMatcher::StartsWith("total cost"),
        paint: BarPaint::Fixed(NEGATIVE_RED),
        format: ValueFormat::Plain,
    },
    StyleRule {
        name: "revenue",
        matcher: NameMatcher::StartsWith("revenue"),
        paint: BarPaint::Fixed(POSITIVE_GREEN),
        format: ValueFormat::Plain,
    },
    StyleRule {
        name: "group",
        matcher: NameMatcher::Any,
        paint: BarPaint::ByGroup,
        format: ValueFormat::Plain,
    },
];

/// First matching rule. Total because the last rule matches any name.
pub fn style_for(kpi_name: &str) -> &'static StyleRule {
    STYLE_RULES
        .iter()
        .find(|rule| rule.matcher.matches(kpi_name))
        .unwrap_or(&STYLE_RULES[STYLE_RULES.len() - 1])
}

/// Horizontal reference line spanning the whole category axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReferenceLine {
    pub y: f64,
    pub x0: f64,
    pub x1: f64,
    pub color: &'static str,
    pub width: u32,
    pub dash: &'static str,
    pub label: &'static str,
    /// Category index the label is anchored at
    pub label_x: usize,
    pub label_y_shift: i32,
    pub label_font_size: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayRule {
    pub name: &'static str,
    pub matcher: NameMatcher,
    pub line: ReferenceLine,
}

pub static OVERLAY_RULES: [OverlayRule; 1] = [OverlayRule {
    name: "co2-goal",
    matcher: NameMatcher::Contains("total co2 emissions"),
    line: ReferenceLine {
        y: 301000.0,
        x0: -0.5,
        x1: 4.5,
        color: "red",
        width: 2,
        dash: "dash",
        label: "Goal: 301k",
        label_x: 4,
        label_y_shift: 10,
        label_font_size: 12,
    },
}];

pub fn overlays_for(kpi_name: &str) -> Vec<ReferenceLine> {
    OVERLAY_RULES
        .iter()
        .filter(|rule| rule.matcher.matches(kpi_name))
        .map(|rule| rule.line)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarTrace {
    pub categories: Vec<String>,
    pub values: Vec<Option<f64>>,
    pub colors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TitleSpec {
    pub text: String,
    pub font_size: u32,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisSpec {
    pub title: String,
    pub show_grid: bool,
    pub grid_color: Option<String>,
    pub zero_line: bool,
    pub tick_format: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Margin {
    pub t: u32,
    pub l: u32,
    pub r: u32,
    pub b: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartLayout {
    pub title: TitleSpec,
    pub x_axis: AxisSpec,
    pub y_axis: AxisSpec,
    pub plot_background: String,
    pub paper_background: String,
    pub margin: Margin,
    pub transition_ms: u32,
}

/// Rendering-library independent bar chart.
/// An empty chart has no trace and no layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartSpec {
    pub bars: Option<BarTrace>,
    pub layout: Option<ChartLayout>,
    pub reference_lines: Vec<ReferenceLine>,
}

impl ChartSpec {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_none()
    }
}

/// Figure plus the text shown below it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartView {
    pub figure: ChartSpec,
    pub description: String,
}

impl ChartView {
    pub fn empty() -> Self {
        Self {
            figure: ChartSpec::empty(),
            description: String::new(),
        }
    }

    fn no_data() -> Self {
        Self {
            figure: ChartSpec::empty(),
            description: NO_DATA_FOUND.to_string(),
        }
    }
}

pub struct ChartBuilder<'a> {
    table: &'a KpiTable,
    descriptions: &'a DescriptionTable,
}

impl<'a> ChartBuilder<'a> {
    pub fn new(table: &'a KpiTable, descriptions: &'a DescriptionTable) -> Self {
        Self {
            table,
            descriptions,
        }
    }

    pub fn build(&self, kpi_name: Option<&str>) -> ChartView {
        let kpi_name = match kpi_name {
            Some(name) if !name.is_empty() => name,
            _ => return ChartView::empty(),
        };

        let record = match self.table.find(kpi_name) {
            Some(record) => record,
            None => {
                debug!("No KPI row named '{}'", kpi_name);
                return ChartView::no_data();
            }
        };

        ChartView {
            figure: figure_for(record),
            description: self.descriptions.describe(kpi_name).to_string(),
        }
    }
}

fn figure_for(record: &KpiRecord) -> ChartSpec {
    let name = record.kpi_name.as_str();
    let rule = style_for(name);

    let colors = record
        .values
        .iter()
        .map(|value| bar_color(rule.paint, *value, &record.group).to_string())
        .collect();

    let bars = BarTrace {
        categories: SCENARIOS.iter().map(|s| s.to_string()).collect(),
        values: record.values.to_vec(),
        colors,
    };

    let layout = ChartLayout {
        title: TitleSpec {
            text: name.to_string(),
            font_size: 24,
            color: "#333".to_string(),
        },
        x_axis: AxisSpec {
            title: X_AXIS_TITLE.to_string(),
            show_grid: false,
            grid_color: None,
            zero_line: false,
            tick_format: None,
        },
        y_axis: AxisSpec {
            title: name.to_string(),
            show_grid: true,
            grid_color: Some("lightgrey".to_string()),
            zero_line: false,
            tick_format: rule.format.tick_format(),
        },
        plot_background: "#ffffff".to_string(),
        paper_background: "#f9f9f9".to_string(),
        margin: Margin {
            t: 80,
            l: 60,
            r: 40,
            b: 60,
        },
        transition_ms: 500,
    };

    ChartSpec {
        bars: Some(bars),
        layout: Some(layout),
        reference_lines: overlays_for(name),
    }
}

fn bar_color(paint: BarPaint, value: Option<f64>, group: &str) -> &'static str {
    match paint {
        BarPaint::BySign {
            non_negative,
            negative,
        } => match value {
            Some(v) if v >= 0.0 => non_negative,
            _ => negative,
        },
        BarPaint::Fixed(color) => color,
        BarPaint::ByGroup => group_color(group),
    }
}
