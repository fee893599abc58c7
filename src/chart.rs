// 📊 Chart Layout Engine - category totals → bar chart geometry
//
// Pure function over a totals snapshot and a canvas size. Coordinates are in
// canvas units with the origin at the top-left, y growing downwards, which is
// what both front-ends draw with (the terminal adapter flips it).
//
// Degenerate inputs (all-zero totals, canvas smaller than the margins, no
// categories) produce well-defined output, never NaN or negative sizes.

use crate::category::ExpenseCategory;
use crate::store::CategoryTotal;
use serde::{Deserialize, Serialize};
use tracing::trace;

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Space reserved around the plot area, in canvas units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Reserved for y-axis labels
    pub left_margin: f64,

    /// Reserved for category labels
    pub bottom_margin: f64,

    /// Headroom above the tallest bar
    pub top_padding: f64,

    /// Horizontal gap between adjacent bars
    pub gutter: f64,

    /// Number of y-axis ticks, including the zero tick
    pub tick_count: usize,
}

impl LayoutConfig {
    /// This config with one axis reserve used for both margins
    pub fn with_axis_reserve(self, axis_reserve: f64) -> Self {
        LayoutConfig {
            left_margin: axis_reserve,
            bottom_margin: axis_reserve,
            ..self
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            left_margin: 50.0,
            bottom_margin: 50.0,
            top_padding: 20.0,
            gutter: 10.0,
            tick_count: 5,
        }
    }
}

// ============================================================================
// GEOMETRY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub category: ExpenseCategory,
    pub value: f64,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisTick {
    pub value: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartGeometry {
    pub bars: Vec<Bar>,
    pub y_axis_ticks: Vec<AxisTick>,
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub plot_width: f64,
    pub plot_height: f64,
    /// Largest total shown; 0 when every total is 0
    pub max_amount: f64,
}

// ============================================================================
// LAYOUT
// ============================================================================

/// Lay out one bar per entry of `totals`, in the given order.
pub fn layout(
    totals: &[CategoryTotal],
    canvas_width: f64,
    canvas_height: f64,
    config: &LayoutConfig,
) -> ChartGeometry {
    let canvas_width = non_negative(canvas_width);
    let canvas_height = non_negative(canvas_height);
    let left_margin = non_negative(config.left_margin);
    let gutter = non_negative(config.gutter);

    let plot_width = non_negative(canvas_width - left_margin);
    let plot_height = non_negative(canvas_height - non_negative(config.bottom_margin));
    let usable_height = non_negative(plot_height - non_negative(config.top_padding));

    // Largest displayable total; negative or non-finite totals never set the scale
    let peak = totals
        .iter()
        .map(|t| t.total)
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max);
    let divisor = if peak > 0.0 { peak } else { 1.0 };
    // Normalise first: usable_height / divisor overflows for subnormal peaks
    let scaled = |value: f64| (value / divisor) * usable_height;

    let n = totals.len();
    let bar_width = if n == 0 {
        0.0
    } else {
        non_negative((plot_width - (n - 1) as f64 * gutter) / n as f64)
    };

    let bars = totals
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let height = non_negative(scaled(t.total)).min(usable_height);
            Bar {
                category: t.category,
                value: t.total,
                x: left_margin + i as f64 * (bar_width + gutter),
                y: plot_height - height,
                width: bar_width,
                height,
            }
        })
        .collect();

    let y_axis_ticks = ticks(peak, config.tick_count)
        .into_iter()
        .map(|value| AxisTick {
            value,
            y: plot_height - scaled(value),
        })
        .collect();

    trace!(
        bars = n,
        canvas_width,
        canvas_height,
        peak,
        "chart laid out"
    );

    ChartGeometry {
        bars,
        y_axis_ticks,
        canvas_width,
        canvas_height,
        plot_width,
        plot_height,
        max_amount: peak,
    }
}

/// `count` evenly spaced values from 0 to `max` inclusive
fn ticks(max: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => {
            let step = max / (count - 1) as f64;
            (0..count)
                .map(|i| if i == count - 1 { max } else { step * i as f64 })
                .collect()
        }
    }
}

fn non_negative(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 {
        v
    } else {
        0.0
    }
}

// ============================================================================
// TESTS
// ============================================================================
