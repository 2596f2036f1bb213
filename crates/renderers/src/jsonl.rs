//! JsonlRenderer - writes one JSON record per tick to a file
//!
//! The first line is a header with the face list and the run start time,
//! followed by one `tick` record per rendered frame:
//!
//! ```text
//! {"type":"header","started_at":"2026-01-01T00:00:00Z","faces":[...]}
//! {"type":"tick","tick":0,"roll":0.0,"pitch":0.0,"yaw":0.0,"vertices":[[-1.0,-1.0,-1.0],...]}
//! ```

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use contracts::{ContractError, Face, RenderFrame, Renderer};
use serde::Serialize;
use tracing::{debug, info, instrument};

/// One line of the output file
#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Record<'a> {
    Header {
        started_at: String,
        faces: &'a [Face],
    },
    Tick {
        tick: u64,
        roll: f64,
        pitch: f64,
        yaw: f64,
        vertices: Vec<[f64; 3]>,
    },
}

/// Renderer that appends JSON lines to a file
pub struct JsonlRenderer {
    name: String,
    path: PathBuf,
    writer: Option<BufWriter<File>>,
    header_written: bool,
    records: u64,
}

impl JsonlRenderer {
    /// Create the output file (and its parent directories), truncating it
    pub fn create(name: impl Into<String>, path: impl AsRef<Path>) -> Result<Self, ContractError> {
        let name = name.into();
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| write_error(&name, &path, e))?;
        }
        let file = File::create(&path).map_err(|e| write_error(&name, &path, e))?;

        debug!(renderer = %name, path = %path.display(), "JsonlRenderer created");

        Ok(Self {
            name,
            path,
            writer: Some(BufWriter::new(file)),
            header_written: false,
            records: 0,
        })
    }

    /// Create from params map (for factory)
    ///
    /// Recognised params: `path` (required).
    pub fn from_params(
        name: impl Into<String>,
        params: &HashMap<String, String>,
    ) -> Result<Self, ContractError> {
        let name = name.into();
        let path = params.get("path").ok_or_else(|| {
            ContractError::config_validation(
                format!("renderers.{name}.params.path"),
                "jsonl renderer requires a 'path' param",
            )
        })?;
        Self::create(name, path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Tick records written so far
    pub fn records(&self) -> u64 {
        self.records
    }

    fn write_record(&mut self, record: &Record<'_>) -> Result<(), ContractError> {
        let writer = self.writer.as_mut().ok_or_else(|| {
            ContractError::renderer_write(&self.name, "renderer already closed")
        })?;

        serde_json::to_writer(&mut *writer, record)
            .map_err(|e| ContractError::renderer_write(&self.name, e.to_string()))?;
        writer
            .write_all(b"\n")
            .map_err(|e| write_error(&self.name, &self.path, e))
    }
}

impl Renderer for JsonlRenderer {
    fn name(&self) -> &str {
        &self.name
    }

    fn render(&mut self, frame: &RenderFrame<'_>) -> Result<(), ContractError> {
        if !self.header_written {
            self.write_record(&Record::Header {
                started_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
                faces: frame.faces,
            })?;
            self.header_written = true;
        }

        self.write_record(&Record::Tick {
            tick: frame.tick,
            roll: frame.attitude.roll,
            pitch: frame.attitude.pitch,
            yaw: frame.attitude.yaw,
            vertices: frame.vertices.iter().map(|v| v.to_array()).collect(),
        })?;
        self.records += 1;
        Ok(())
    }

    #[instrument(name = "jsonl_renderer_close", skip(self), fields(renderer = %self.name))]
    fn close(&mut self) -> Result<(), ContractError> {
        let Some(mut writer) = self.writer.take() else {
            return Ok(());
        };
        writer
            .flush()
            .map_err(|e| write_error(&self.name, &self.path, e))?;

        info!(
            renderer = %self.name,
            path = %self.path.display(),
            records = self.records,
            "JsonlRenderer closed"
        );
        Ok(())
    }
}

fn write_error(name: &str, path: &Path, e: std::io::Error) -> ContractError {
    ContractError::renderer_write(name, format!("{}: {}", path.display(), e))
}
