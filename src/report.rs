use serde::de::Unexpected;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Fatal problems with the input report. Raised before any aggregation starts.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("File not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {}: {source}", path.display())]
    InvalidFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Run metadata recorded by the benchmark harness
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Context {
    pub host_name: Option<String>,
    /// Timestamp string as written by the harness
    pub date: Option<String>,
    pub executable: Option<String>,
    pub num_cpus: Option<u32>,
    pub mhz_per_cpu: Option<u32>,
}

impl Context {
    pub fn host(&self) -> &str {
        self.host_name.as_deref().unwrap_or("unknown")
    }

    /// Date portion (first 10 characters) of the run timestamp, or empty.
    pub fn short_date(&self) -> String {
        self.date
            .as_deref()
            .map(|d| d.chars().take(10).collect())
            .unwrap_or_default()
    }
}

/// One benchmark entry as it appears in the report
#[derive(Debug, Clone, Deserialize)]
pub struct RawRecord {
    pub name: String,
    #[serde(default)]
    pub bytes_per_second: Option<f64>,
    /// Secondary per-cycle metric, if the harness recorded one
    #[serde(default, rename = "bytes/cycle")]
    pub bytes_per_cycle: Option<f64>,
}

impl RawRecord {
    pub fn new(name: impl Into<String>, bytes_per_second: f64) -> Self {
        Self {
            name: name.into(),
            bytes_per_second: Some(bytes_per_second),
            bytes_per_cycle: None,
        }
    }
}

/// A parsed benchmark report
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Report {
    pub context: Context,
    pub benchmarks: Vec<RawRecord>,
}

impl Report {
    /// Decode a report. The top-level value must be a JSON object.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        if !value.is_object() {
            return Err(serde::de::Error::invalid_type(
                unexpected(&value),
                &"a report object",
            ));
        }
        serde_json::from_value(value)
    }

    /// Read and decode a report file.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let json = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                LoadError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                LoadError::Read {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        Self::from_json(&json).map_err(|source| LoadError::InvalidFormat {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn unexpected(value: &serde_json::Value) -> Unexpected<'_> {
    match value {
        serde_json::Value::Null => Unexpected::Unit,
        serde_json::Value::Bool(b) => Unexpected::Bool(*b),
        serde_json::Value::Number(_) => Unexpected::Other("number"),
        serde_json::Value::String(s) => Unexpected::Str(s),
        serde_json::Value::Array(_) => Unexpected::Seq,
        serde_json::Value::Object(_) => Unexpected::Map,
    }
}
