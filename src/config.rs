use crate::{
    args::{Args, EXPIRY_CHOICES},
    invitation::{InvitationRequest, UNLIMITED},
};
use serde::Deserialize;
use serde_json::Value;
use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config file {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("invalid config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("--count is required when --config is not used")]
    MissingCount,
    #[error("--server-ids is required")]
    MissingServerIds,
    #[error("expires_in_days must be one of 1, 7 or 30, got {0}")]
    InvalidExpiry(u32),
    #[error("duration must be \"unlimited\" or a number of days, got \"{0}\"")]
    InvalidDuration(String),
}

/// Batch parameters as read from a `--config` JSON file.
///
/// Keys the client does not use are kept aside and reported, not rejected.
#[derive(Deserialize, Debug, Default, PartialEq)]
pub struct FileConfig {
    pub count: Option<u32>,
    pub server_ids: Option<Vec<i64>>,
    pub expires_in_days: Option<u32>,
    pub duration: Option<String>,
    pub unlimited: Option<bool>,
    pub library_ids: Option<Vec<i64>>,
    pub allow_downloads: Option<bool>,
    pub allow_live_tv: Option<bool>,
    pub allow_mobile_uploads: Option<bool>,
    pub stop_on_error: Option<bool>,
    #[serde(flatten)]
    pub unknown: BTreeMap<String, Value>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        for key in config.unknown.keys() {
            log::warn!("Ignoring unknown key `{key}` in {}", path.display());
        }

        Ok(config)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchConfig {
    pub count: u32,
    pub stop_on_error: bool,
    pub request: InvitationRequest,
}

impl BatchConfig {
    /// Merges command line over config file over defaults, then validates.
    pub fn resolve(args: &Args, file: Option<FileConfig>) -> Result<Self, ConfigError> {
        let from_file = file.is_some();
        let file = file.unwrap_or_default();

        let count = match args.count.or(file.count) {
            Some(count) => count,
            None if from_file => 1,
            None => return Err(ConfigError::MissingCount),
        };

        let server_ids = args
            .server_ids
            .clone()
            .or(file.server_ids)
            .filter(|ids| !ids.is_empty())
            .ok_or(ConfigError::MissingServerIds)?;

        let expires_in_days = args.expires_in_days.or(file.expires_in_days);
        if let Some(days) = expires_in_days {
            if !EXPIRY_CHOICES.contains(&days) {
                return Err(ConfigError::InvalidExpiry(days));
            }
        }

        let duration = args
            .duration
            .clone()
            .or(file.duration)
            .unwrap_or_else(|| UNLIMITED.to_string());
        validate_duration(&duration)?;

        let unlimited = if args.no_unlimited {
            false
        } else {
            file.unlimited.unwrap_or(true)
        };

        let request = InvitationRequest {
            expires_in_days,
            duration,
            unlimited,
            library_ids: args.library_ids.clone().or(file.library_ids),
            allow_downloads: args.allow_downloads || file.allow_downloads.unwrap_or(false),
            allow_live_tv: args.allow_live_tv || file.allow_live_tv.unwrap_or(false),
            allow_mobile_uploads: args.allow_mobile_uploads
                || file.allow_mobile_uploads.unwrap_or(false),
            ..InvitationRequest::new(server_ids)
        };

        Ok(Self {
            count,
            stop_on_error: args.stop_on_error || file.stop_on_error.unwrap_or(false),
            request,
        })
    }
}

fn validate_duration(duration: &str) -> Result<(), ConfigError> {
    let is_days = !duration.is_empty() && duration.bytes().all(|b| b.is_ascii_digit());

    if duration == UNLIMITED || is_days {
        Ok(())
    } else {
        Err(ConfigError::InvalidDuration(duration.to_string()))
    }
}
