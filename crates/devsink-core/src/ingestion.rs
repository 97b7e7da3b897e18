use std::fmt;
use std::path::PathBuf;

use serde_json::Value;
use tracing::{debug, info};

use crate::device_id::{DeviceId, DeviceIdProfile};
use crate::error::Result;
use crate::store::ArtifactStore;

pub const DEVICE_ID_FIELD: &str = "deviceId";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    NotAnObject,
    MissingDeviceId,
    DeviceIdNotString,
    InvalidDeviceId(String),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::NotAnObject => f.write_str("payload is not a JSON object"),
            Rejection::MissingDeviceId => write!(f, "payload has no {DEVICE_ID_FIELD} field"),
            Rejection::DeviceIdNotString => write!(f, "{DEVICE_ID_FIELD} is not a string"),
            Rejection::InvalidDeviceId(value) => write!(f, "device id '{value}' is not accepted"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredArtifact {
    pub device_id: DeviceId,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    Stored(StoredArtifact),
    Rejected(Rejection),
}

impl IngestOutcome {
    pub fn is_stored(&self) -> bool {
        matches!(self, IngestOutcome::Stored(_))
    }
}

/// Validates the device id of incoming payloads and persists the accepted ones.
#[derive(Debug, Clone)]
pub struct Ingestor {
    profile: DeviceIdProfile,
    store: ArtifactStore,
}

impl Ingestor {
    pub fn new(profile: DeviceIdProfile, store: ArtifactStore) -> Self {
        Self { profile, store }
    }

    pub fn profile(&self) -> DeviceIdProfile {
        self.profile
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    /// Extracts and validates the device id without touching the filesystem.
    pub fn validate(&self, payload: &Value) -> std::result::Result<DeviceId, Rejection> {
        let object = payload.as_object().ok_or(Rejection::NotAnObject)?;
        let raw = object
            .get(DEVICE_ID_FIELD)
            .ok_or(Rejection::MissingDeviceId)?
            .as_str()
            .ok_or(Rejection::DeviceIdNotString)?;

        DeviceId::parse(self.profile, raw)
            .map_err(|_| Rejection::InvalidDeviceId(raw.to_string()))
    }

    /// Rejections are reported in the outcome, only filesystem failures are errors.
    pub async fn ingest(&self, payload: &Value) -> Result<IngestOutcome> {
        let device_id = match self.validate(payload) {
            Ok(device_id) => device_id,
            Err(rejection) => {
                debug!(%rejection, "dropping payload");
                return Ok(IngestOutcome::Rejected(rejection));
            }
        };

        let path = self.store.store(&device_id, payload).await?;
        info!(
            device_id = %device_id,
            path = %path.display(),
            "saving data from device"
        );

        Ok(IngestOutcome::Stored(StoredArtifact { device_id, path }))
    }
}
