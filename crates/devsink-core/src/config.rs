use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use crate::device_id::DeviceIdProfile;
use crate::error::ConfigError;
use crate::ingestion::Ingestor;
use crate::store::ArtifactStore;

pub const BIND_VAR: &str = "DEVSINK_BIND";
pub const PORT_VAR: &str = "DEVSINK_PORT";
pub const DATA_DIR_VAR: &str = "DEVSINK_DATA_DIR";
pub const PROFILE_VAR: &str = "DEVSINK_ID_PROFILE";

pub const DEFAULT_PORT: u16 = 1234;
pub const DEFAULT_DATA_DIR: &str = "data";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiverConfig {
    pub bind: IpAddr,
    pub port: u16,
    pub data_dir: PathBuf,
    pub profile: DeviceIdProfile,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            profile: DeviceIdProfile::default(),
        }
    }
}

impl ReceiverConfig {
    /// Reads the `DEVSINK_*` variables from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable lookup; unset variables keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(BIND_VAR) {
            config.bind = value.trim().parse().map_err(|_| ConfigError::InvalidBind {
                var: BIND_VAR,
                value: value.clone(),
            })?;
        }

        if let Some(value) = lookup(PORT_VAR) {
            config.port = value.trim().parse().map_err(|_| ConfigError::InvalidPort {
                var: PORT_VAR,
                value: value.clone(),
            })?;
        }

        if let Some(value) = lookup(DATA_DIR_VAR) {
            if value.trim().is_empty() {
                return Err(ConfigError::Empty { var: DATA_DIR_VAR });
            }
            config.data_dir = PathBuf::from(value);
        }

        if let Some(value) = lookup(PROFILE_VAR) {
            config.profile = value.parse().map_err(|_| ConfigError::InvalidProfile {
                var: PROFILE_VAR,
                value: value.clone(),
            })?;
        }

        Ok(config)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }

    pub fn ingestor(&self) -> Ingestor {
        Ingestor::new(self.profile, ArtifactStore::new(self.data_dir.clone()))
    }
}
