use polars::prelude::PolarsError;
use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum GanttError {
    #[error("malformed schedule: {0}")]
    MalformedSchedule(String),

    #[error("task '{task}' has invalid start_date '{value}' (expected YYYY-MM-DD)")]
    InvalidDate { task: String, value: String },

    #[error("io error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("timeline frame error: {0}")]
    Frame(#[from] PolarsError),

    #[error("invalid selection: {0}")]
    InvalidSelection(String),

    #[error("invalid upload: {0}")]
    InvalidUpload(String),

    #[error("render error: {0}")]
    Render(String),
}

impl GanttError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}

pub type GanttResult<T> = Result<T, GanttError>;
