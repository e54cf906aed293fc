use crate::chart::{ChartSpec, raster, svg};
use crate::config::AppConfig;
use crate::error::{GanttError, GanttResult};
use crate::registry::{FileRegistry, RegistryEntry, SCHEDULE_EXTENSION};
use crate::timeline::Timeline;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const EXPORT_SUFFIX: &str = "_gantt_chart";
pub const EXPORT_EXTENSION: &str = "png";

#[derive(Debug, Clone, Serialize)]
pub struct SelectResponse {
    pub file: String,
    pub timeline: Timeline,
    pub chart: ChartSpec,
    pub svg: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadRequest {
    pub filename: String,
    /// Browser data URL: `data:<mime>;base64,<payload>`.
    pub contents: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub entries: Vec<RegistryEntry>,
    pub selected: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportStatus {
    pub file: Option<String>,
    pub output: Option<PathBuf>,
    pub message: String,
}

/// Request handlers behind the viewer page. Each call reads the watched
/// directory afresh; nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct Shell {
    registry: FileRegistry,
    export_dir: PathBuf,
}

impl Shell {
    pub fn new(registry: FileRegistry, export_dir: impl Into<PathBuf>) -> Self {
        Self {
            registry,
            export_dir: export_dir.into(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            FileRegistry::new(config.schedule_dir.clone()),
            config.export_dir.clone(),
        )
    }

    pub fn registry(&self) -> &FileRegistry {
        &self.registry
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    pub fn entries(&self) -> GanttResult<Vec<RegistryEntry>> {
        self.registry.entries()
    }

    pub fn select(&self, file: &str) -> GanttResult<SelectResponse> {
        let (timeline, chart) = self.build_chart(file)?;
        info!(file, rows = timeline.rows.len(), "schedule selected");
        let svg = svg::render(&chart);
        Ok(SelectResponse {
            file: file.to_string(),
            timeline,
            chart,
            svg,
        })
    }

    /// Stores the uploaded document verbatim and selects it. The content is
    /// not validated here; the next select reports any problem.
    pub fn upload(&self, request: &UploadRequest) -> GanttResult<UploadResponse> {
        let text = decode_data_url(&request.contents)?;
        let path = self.registry.store(&request.filename, text.as_bytes())?;
        if Path::new(&request.filename)
            .extension()
            .and_then(|ext| ext.to_str())
            != Some(SCHEDULE_EXTENSION)
        {
            warn!(
                file = %request.filename,
                "uploaded file lacks the .{SCHEDULE_EXTENSION} extension and will not be listed"
            );
        }
        info!(file = %request.filename, path = %path.display(), bytes = text.len(), "schedule uploaded");
        let entries = self.registry.entries()?;
        Ok(UploadResponse {
            entries,
            selected: request.filename.clone(),
        })
    }

    pub fn export(&self, file: &str) -> GanttResult<ExportStatus> {
        let (_, chart) = self.build_chart(file)?;
        let output_name = export_file_name(file);
        let output = self.export_dir.join(&output_name);
        raster::write_png(&chart, &output)?;
        info!(file, output = %output.display(), "chart exported");
        Ok(ExportStatus {
            file: Some(file.to_string()),
            output: Some(output),
            message: format!("Gantt chart exported as '{output_name}'"),
        })
    }

    fn build_chart(&self, file: &str) -> GanttResult<(Timeline, ChartSpec)> {
        let path = self.registry.resolve(file)?;
        let timeline = Timeline::load(&path)?;
        let chart = ChartSpec::build(&timeline)?;
        Ok((timeline, chart))
    }
}

/// `plan.json` → `plan_gantt_chart.png`.
pub fn export_file_name(file: &str) -> String {
    let stem = Path::new(file)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(file);
    format!("{stem}{EXPORT_SUFFIX}.{EXPORT_EXTENSION}")
}

pub fn decode_data_url(contents: &str) -> GanttResult<String> {
    let (_, payload) = contents.split_once(',').ok_or_else(|| {
        GanttError::InvalidUpload("expected a data URL with a base64 payload".into())
    })?;
    let bytes = BASE64
        .decode(payload.trim())
        .map_err(|err| GanttError::InvalidUpload(format!("payload is not base64: {err}")))?;
    String::from_utf8(bytes)
        .map_err(|err| GanttError::InvalidUpload(format!("payload is not UTF-8: {err}")))
}
