pub mod config;
pub mod device_id;
pub mod error;
pub mod ingestion;
pub mod store;

pub use config::ReceiverConfig;
pub use device_id::{DeviceId, DeviceIdProfile, DeviceKind};
pub use error::{ConfigError, DeviceIdError, StoreError};
pub use ingestion::{IngestOutcome, Ingestor, Rejection, StoredArtifact};
pub use store::ArtifactStore;
