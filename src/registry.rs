use crate::error::{GanttError, GanttResult};
use crate::schedule::ChartNameProbe;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const SCHEDULE_EXTENSION: &str = "json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    /// File name inside the watched directory; doubles as the selection key.
    pub file: String,
    pub path: PathBuf,
    /// `chart_name` from the document, or the file name when unreadable.
    pub name: String,
}

/// The watched directory of schedule documents. Every query rescans it.
#[derive(Debug, Clone)]
pub struct FileRegistry {
    dir: PathBuf,
}

impl FileRegistry {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn ensure_dir(&self) -> GanttResult<()> {
        fs::create_dir_all(&self.dir).map_err(|err| GanttError::io(&self.dir, err))
    }

    pub fn entries(&self) -> GanttResult<Vec<RegistryEntry>> {
        let listing = fs::read_dir(&self.dir).map_err(|err| GanttError::io(&self.dir, err))?;
        let mut entries = collect_entries(listing.map(|item| item.map(|entry| entry.path())));
        entries.sort_by(|a, b| a.file.cmp(&b.file));
        Ok(entries)
    }

    /// Maps a selection key onto a path inside the watched directory.
    pub fn resolve(&self, file: &str) -> GanttResult<PathBuf> {
        validate_file_name(file)?;
        Ok(self.dir.join(file))
    }

    /// Writes `bytes` under `file`, replacing any existing document.
    pub fn store(&self, file: &str, bytes: &[u8]) -> GanttResult<PathBuf> {
        let path = self.resolve(file)?;
        fs::write(&path, bytes).map_err(|err| GanttError::io(&path, err))?;
        Ok(path)
    }
}

/// Listing stays usable when one directory entry cannot be read.
fn collect_entries(items: impl Iterator<Item = io::Result<PathBuf>>) -> Vec<RegistryEntry> {
    let mut entries = Vec::new();
    for item in items {
        let path = match item {
            Ok(path) => path,
            Err(err) => {
                debug!(error = %err, "skipping unreadable directory entry");
                continue;
            }
        };
        if !path.is_file() || !has_schedule_extension(&path) {
            continue;
        }
        let Some(file) = path.file_name().and_then(|name| name.to_str()) else {
            debug!(path = %path.display(), "skipping schedule with non-UTF-8 file name");
            continue;
        };
        let file = file.to_string();
        let name = display_name(&path).unwrap_or_else(|| file.clone());
        entries.push(RegistryEntry { file, path, name });
    }
    entries
}

fn has_schedule_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext == SCHEDULE_EXTENSION)
}

fn display_name(path: &Path) -> Option<String> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) => {
            debug!(path = %path.display(), error = %err, "schedule unreadable; using file name");
            return None;
        }
    };
    match serde_json::from_slice::<ChartNameProbe>(&bytes) {
        Ok(probe) => probe.chart_name,
        Err(err) => {
            debug!(path = %path.display(), error = %err, "schedule name unreadable; using file name");
            None
        }
    }
}

pub(crate) fn validate_file_name(file: &str) -> GanttResult<()> {
    let trimmed = file.trim();
    if trimmed.is_empty() {
        return Err(GanttError::InvalidSelection("file name is empty".into()));
    }
    if trimmed != file
        || file.contains(['/', '\\'])
        || file == "."
        || file == ".."
        || file.contains('\0')
    {
        return Err(GanttError::InvalidSelection(format!(
            "'{file}' is not a plain file name"
        )));
    }
    Ok(())
}
