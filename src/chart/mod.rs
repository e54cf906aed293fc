pub mod raster;
pub mod svg;

use crate::error::GanttResult;
use crate::timeline::{CriticalPath, Timeline};
use chrono::{Datelike, Months, NaiveDate};
use polars::prelude::*;
use serde::Serialize;

pub const CRITICAL_COLOR: &str = "#C81D25";
pub const NON_CRITICAL_COLOR: &str = "#3C4E66";
pub const LEGEND_TITLE: &str = "Critical Path";

pub fn color_for(critical_path: CriticalPath) -> &'static str {
    match critical_path {
        CriticalPath::Critical => CRITICAL_COLOR,
        CriticalPath::NonCritical => NON_CRITICAL_COLOR,
    }
}

/// Fixed cosmetics shared by the viewport and the exported image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub width: u32,
    pub height: u32,
    pub plot_bgcolor: String,
    pub paper_bgcolor: String,
    pub font_family: String,
    pub font_color: String,
    pub title_font_family: String,
    pub title_font_size: u32,
    pub title_x: f64,
    pub x_axis_title: String,
    pub y_axis_title: String,
    pub tick_format: String,
    pub show_grid: bool,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            width: 1100,
            height: 600,
            plot_bgcolor: "#F4F4F9".to_string(),
            paper_bgcolor: "#F4F4F9".to_string(),
            font_family: "Arial".to_string(),
            font_color: "#3C4E66".to_string(),
            title_font_family: "Arial Black".to_string(),
            title_font_size: 24,
            title_x: 0.5,
            x_axis_title: "Timeline".to_string(),
            y_axis_title: "Tasks".to_string(),
            tick_format: "%Y-%m".to_string(),
            show_grid: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bar {
    pub task: String,
    pub section: String,
    pub start: NaiveDate,
    pub finish: NaiveDate,
    pub critical_path: CriticalPath,
    pub color: String,
}

impl Bar {
    /// Earlier and later end of the bar; a negative duration swaps them.
    pub fn extent(&self) -> (NaiveDate, NaiveDate) {
        if self.finish < self.start {
            (self.finish, self.start)
        } else {
            (self.start, self.finish)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegendEntry {
    pub label: CriticalPath,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AxisTick {
    pub date: NaiveDate,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeAxis {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub ticks: Vec<AxisTick>,
}

impl TimeAxis {
    fn spanning(bars: &[Bar], tick_format: &str) -> Option<Self> {
        let start = bars.iter().map(|bar| bar.extent().0).min()?;
        let end = bars.iter().map(|bar| bar.extent().1).max()?;
        let mut ticks = Vec::new();
        let mut cursor = first_of_month_on_or_after(start);
        while let Some(date) = cursor {
            if date > end {
                break;
            }
            ticks.push(AxisTick {
                date,
                label: date.format(tick_format).to_string(),
            });
            cursor = date.checked_add_months(Months::new(1));
        }
        if ticks.is_empty() {
            ticks.push(AxisTick {
                date: start,
                label: start.format(tick_format).to_string(),
            });
        }
        Some(Self { start, end, ticks })
    }

    pub fn span_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

fn first_of_month_on_or_after(date: NaiveDate) -> Option<NaiveDate> {
    let first = date.with_day(1)?;
    if first == date {
        Some(first)
    } else {
        first.checked_add_months(Months::new(1))
    }
}

/// Everything needed to draw one Gantt chart. Built once per request and
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub bars: Vec<Bar>,
    /// Category axis, bottom to top.
    pub category_order: Vec<String>,
    pub legend_title: String,
    pub legend: Vec<LegendEntry>,
    pub time_axis: Option<TimeAxis>,
    pub layout: Layout,
}

impl ChartSpec {
    pub fn build(timeline: &Timeline) -> GanttResult<Self> {
        let layout = Layout::default();
        let bars: Vec<Bar> = timeline
            .rows
            .iter()
            .map(|row| Bar {
                task: row.task.clone(),
                section: row.section.clone(),
                start: row.start,
                finish: row.finish,
                critical_path: row.critical_path,
                color: color_for(row.critical_path).to_string(),
            })
            .collect();

        let mut legend: Vec<LegendEntry> = Vec::new();
        for bar in &bars {
            if !legend.iter().any(|entry| entry.label == bar.critical_path) {
                legend.push(LegendEntry {
                    label: bar.critical_path,
                    color: bar.color.clone(),
                });
            }
        }

        let category_order = category_order(timeline)?;
        let time_axis = TimeAxis::spanning(&bars, &layout.tick_format);

        Ok(Self {
            title: timeline.chart_title.clone(),
            bars,
            category_order,
            legend_title: LEGEND_TITLE.to_string(),
            legend,
            time_axis,
            layout,
        })
    }

    pub fn category_index(&self, task: &str) -> Option<usize> {
        self.category_order.iter().position(|name| name == task)
    }
}

/// Task names ordered by their summed bar span, smallest first. Ties keep
/// the order in which the task first appears.
fn category_order(timeline: &Timeline) -> GanttResult<Vec<String>> {
    if timeline.is_empty() {
        return Ok(Vec::new());
    }
    let totals = timeline
        .frame()?
        .lazy()
        .group_by_stable([col("task")])
        .agg([col("span_days").sum().alias("total_days")])
        .sort(
            ["total_days"],
            SortMultipleOptions::default().with_maintain_order(true),
        )
        .collect()?;
    let names = totals.column("task")?.str()?;
    Ok(names.into_iter().flatten().map(str::to_string).collect())
}
