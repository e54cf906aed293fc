pub mod chart;
pub mod config;
pub mod error;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod registry;
pub mod schedule;
pub mod shell;
pub mod timeline;

pub use chart::{AxisTick, Bar, ChartSpec, Layout, LegendEntry, TimeAxis};
pub use config::{AppConfig, ConfigError};
pub use error::{GanttError, GanttResult};
pub use registry::{FileRegistry, RegistryEntry};
pub use schedule::{DEFAULT_CHART_NAME, ScheduleDocument, SectionDocument, TaskDocument};
pub use shell::{
    ExportStatus, SelectResponse, Shell, UploadRequest, UploadResponse, export_file_name,
};
pub use timeline::{CriticalPath, Timeline, TimelineRow};
