use serde::{Deserialize, Serialize};

pub const DEFAULT_CHART_NAME: &str = "Project Gantt Chart";

/// A schedule file as authored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart_name: Option<String>,
    pub sections: Vec<SectionDocument>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionDocument {
    pub section_name: String,
    pub tasks: Vec<TaskDocument>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDocument {
    pub task_name: String,
    pub start_date: String,
    pub duration_days: i64,
    #[serde(default)]
    pub is_critical: bool,
}

impl ScheduleDocument {
    pub fn chart_title(&self) -> &str {
        self.chart_name.as_deref().unwrap_or(DEFAULT_CHART_NAME)
    }

    pub fn task_count(&self) -> usize {
        self.sections.iter().map(|section| section.tasks.len()).sum()
    }
}

impl TaskDocument {
    pub fn new(
        task_name: impl Into<String>,
        start_date: impl Into<String>,
        duration_days: i64,
    ) -> Self {
        Self {
            task_name: task_name.into(),
            start_date: start_date.into(),
            duration_days,
            is_critical: false,
        }
    }

    pub fn critical(mut self) -> Self {
        self.is_critical = true;
        self
    }
}

/// Only the display name; the rest of the document may be malformed.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ChartNameProbe {
    #[serde(default)]
    pub chart_name: Option<String>,
}
