use crate::error::{GanttError, GanttResult};
use crate::schedule::{ScheduleDocument, TaskDocument};
use chrono::{Datelike, Duration, NaiveDate};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::warn;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CriticalPath {
    #[serde(rename = "Critical")]
    Critical,
    #[serde(rename = "Non-Critical")]
    NonCritical,
}

impl CriticalPath {
    pub fn from_flag(is_critical: bool) -> Self {
        if is_critical {
            CriticalPath::Critical
        } else {
            CriticalPath::NonCritical
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CriticalPath::Critical => "Critical",
            CriticalPath::NonCritical => "Non-Critical",
        }
    }
}

impl fmt::Display for CriticalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One task flattened together with the section that owns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineRow {
    #[serde(rename = "Task")]
    pub task: String,
    #[serde(rename = "Start")]
    pub start: NaiveDate,
    #[serde(rename = "Finish")]
    pub finish: NaiveDate,
    #[serde(rename = "Critical Path")]
    pub critical_path: CriticalPath,
    #[serde(rename = "Section")]
    pub section: String,
}

impl TimelineRow {
    pub fn from_task(section_name: &str, task: &TaskDocument) -> GanttResult<Self> {
        let start = parse_start_date(&task.start_date).ok_or_else(|| GanttError::InvalidDate {
            task: task.task_name.clone(),
            value: task.start_date.clone(),
        })?;
        if task.duration_days < 0 {
            warn!(
                task = %task.task_name,
                duration_days = task.duration_days,
                "negative duration accepted; finish precedes start"
            );
        }
        let finish = Duration::try_days(task.duration_days)
            .and_then(|span| start.checked_add_signed(span))
            .ok_or_else(|| {
                GanttError::MalformedSchedule(format!(
                    "task '{}' duration {} days falls outside the calendar",
                    task.task_name, task.duration_days
                ))
            })?;
        Ok(Self {
            task: task.task_name.clone(),
            start,
            finish,
            critical_path: CriticalPath::from_flag(task.is_critical),
            section: section_name.to_string(),
        })
    }

    pub fn span_days(&self) -> i64 {
        (self.finish - self.start).num_days()
    }
}

/// chrono's `%Y` also takes signed or short years; require four digits first.
fn parse_start_date(value: &str) -> Option<NaiveDate> {
    let bytes = value.as_bytes();
    let year_ok = bytes.len() > 4 && bytes[..4].iter().all(u8::is_ascii_digit) && bytes[4] == b'-';
    if !year_ok || value.trim_end() != value {
        return None;
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

/// Rows plus the chart title, ready for the chart builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeline {
    pub rows: Vec<TimelineRow>,
    pub chart_title: String,
}

impl Timeline {
    pub fn load<P: AsRef<Path>>(path: P) -> GanttResult<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|err| GanttError::io(path, err))?;
        Self::parse(bytes)
    }

    pub fn parse(bytes: impl AsRef<[u8]>) -> GanttResult<Self> {
        let document: ScheduleDocument = serde_json::from_slice(bytes.as_ref())
            .map_err(|err| GanttError::MalformedSchedule(err.to_string()))?;
        Self::from_document(&document)
    }

    pub fn from_document(document: &ScheduleDocument) -> GanttResult<Self> {
        let mut rows = Vec::with_capacity(document.task_count());
        for section in &document.sections {
            for task in &section.tasks {
                rows.push(TimelineRow::from_task(&section.section_name, task)?);
            }
        }
        Ok(Self {
            rows,
            chart_title: document.chart_title().to_string(),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Columnar view of the rows: `task`, `start`, `finish`, `critical_path`,
    /// `section`, `span_days`.
    pub fn frame(&self) -> PolarsResult<DataFrame> {
        let tasks: Vec<&str> = self.rows.iter().map(|row| row.task.as_str()).collect();
        let starts: Vec<i32> = self.rows.iter().map(|row| date_to_i32(row.start)).collect();
        let finishes: Vec<i32> = self.rows.iter().map(|row| date_to_i32(row.finish)).collect();
        let labels: Vec<&str> = self
            .rows
            .iter()
            .map(|row| row.critical_path.as_str())
            .collect();
        let sections: Vec<&str> = self.rows.iter().map(|row| row.section.as_str()).collect();
        let spans: Vec<i64> = self.rows.iter().map(TimelineRow::span_days).collect();

        let task = Series::new(PlSmallStr::from_static("task"), tasks);
        let start = Series::new(PlSmallStr::from_static("start"), starts).cast(&DataType::Date)?;
        let finish =
            Series::new(PlSmallStr::from_static("finish"), finishes).cast(&DataType::Date)?;
        let critical_path = Series::new(PlSmallStr::from_static("critical_path"), labels);
        let section = Series::new(PlSmallStr::from_static("section"), sections);
        let span_days = Series::new(PlSmallStr::from_static("span_days"), spans);

        DataFrame::new(vec![
            task.into(),
            start.into(),
            finish.into(),
            critical_path.into(),
            section.into(),
            span_days.into(),
        ])
    }
}

/// Polars stores dates as days since the Unix epoch.
pub(crate) fn date_to_i32(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}
