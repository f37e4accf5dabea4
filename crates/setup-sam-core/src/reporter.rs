//! Output sink for the host task runner
//!
//! Informational lines, warning/failure annotations and PATH updates all go
//! through [`Reporter`]. [`ActionsReporter`] speaks the GitHub Actions workflow
//! command protocol; [`MemoryReporter`] records events for inspection.

use crate::{Result, SetupError};
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub trait Reporter {
    /// Plain log line
    fn info(&self, message: &str);

    /// Non-fatal problem shown as an annotation
    fn warning(&self, message: &str);

    /// Marks the run as failed
    fn set_failed(&self, message: &str);

    /// Prepends `dir` to PATH for subsequent steps
    fn add_path(&self, dir: &Path) -> Result<()>;
}

/// Escapes a workflow command payload
fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Reporter writing GitHub Actions workflow commands to stdout
#[derive(Debug, Clone, Default)]
pub struct ActionsReporter {
    /// File named by `GITHUB_PATH`, if the runner provided one
    path_file: Option<PathBuf>,
}

impl ActionsReporter {
    pub fn new(path_file: Option<PathBuf>) -> Self {
        Self { path_file }
    }

    fn emit(&self, line: &str) {
        let mut out = io::stdout().lock();
        // stdout going away is not worth failing the run over
        let _ = writeln!(out, "{line}");
    }
}

impl Reporter for ActionsReporter {
    fn info(&self, message: &str) {
        log::debug!("info: {}", message);
        self.emit(message);
    }

    fn warning(&self, message: &str) {
        log::debug!("warning: {}", message);
        self.emit(&format!("::warning::{}", escape_data(message)));
    }

    fn set_failed(&self, message: &str) {
        log::debug!("failed: {}", message);
        self.emit(&format!("::error::{}", escape_data(message)));
    }

    fn add_path(&self, dir: &Path) -> Result<()> {
        match &self.path_file {
            Some(path_file) => {
                let mut file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path_file)
                    .map_err(|e| {
                        SetupError::Generic(format!(
                            "Failed to open {}: {}",
                            path_file.display(),
                            e
                        ))
                    })?;
                writeln!(file, "{}", dir.display())?;
            }
            None => self.emit(&format!("::add-path::{}", dir.display())),
        }

        log::info!("Added {} to PATH", dir.display());
        Ok(())
    }
}

/// Event captured by [`MemoryReporter`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportEvent {
    Info(String),
    Warning(String),
    Failed(String),
    AddPath(PathBuf),
}

/// Reporter that keeps every event in memory
#[derive(Debug, Default)]
pub struct MemoryReporter {
    events: Mutex<Vec<ReportEvent>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, event: ReportEvent) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event);
    }

    pub fn events(&self) -> Vec<ReportEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ReportEvent::Warning(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ReportEvent::AddPath(dir) => Some(dir),
                _ => None,
            })
            .collect()
    }
}

impl Reporter for MemoryReporter {
    fn info(&self, message: &str) {
        self.push(ReportEvent::Info(message.to_string()));
    }

    fn warning(&self, message: &str) {
        self.push(ReportEvent::Warning(message.to_string()));
    }

    fn set_failed(&self, message: &str) {
        self.push(ReportEvent::Failed(message.to_string()));
    }

    fn add_path(&self, dir: &Path) -> Result<()> {
        self.push(ReportEvent::AddPath(dir.to_path_buf()));
        Ok(())
    }
}
