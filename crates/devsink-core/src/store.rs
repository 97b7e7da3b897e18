use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

use crate::device_id::DeviceId;
use crate::error::{Result, StoreError};

/// Lower and upper bound (inclusive) of the random filename suffix.
pub const SUFFIX_MIN: u32 = 10_000;
pub const SUFFIX_MAX: u32 = 99_999;

const DEFAULT_INDENT: &[u8] = b"    ";

/// Filesystem layout for accepted payloads:
/// `<root>/<deviceId>/<unixSeconds>_<suffix>.json`.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn device_dir(&self, device_id: &DeviceId) -> PathBuf {
        self.root.join(device_id.as_str())
    }

    pub fn artifact_name(timestamp: i64, suffix: u32) -> String {
        format!("{timestamp}_{suffix}.json")
    }

    pub fn next_artifact_name() -> String {
        let timestamp = Utc::now().timestamp();
        let suffix = fastrand::u32(SUFFIX_MIN..=SUFFIX_MAX);
        Self::artifact_name(timestamp, suffix)
    }

    /// Pretty-prints the payload with four-space indentation.
    pub fn render(payload: &Value) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(DEFAULT_INDENT);
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        payload.serialize(&mut serializer)?;
        Ok(buf)
    }

    /// Writes `payload` into a freshly named file under the device directory,
    /// creating the directory (and its ancestors) when missing.
    pub async fn store(&self, device_id: &DeviceId, payload: &Value) -> Result<PathBuf> {
        let dir = self.device_dir(device_id);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|source| StoreError::CreateDir {
                path: dir.clone(),
                source,
            })?;

        let contents = Self::render(payload)?;
        let path = dir.join(Self::next_artifact_name());
        tokio::fs::write(&path, contents)
            .await
            .map_err(|source| StoreError::Write {
                path: path.clone(),
                source,
            })?;

        Ok(path)
    }
}
