use std::hash::Hasher;
use std::path::{Path, PathBuf};

use bincode::{Decode, Encode};
use compio::fs;
use metrohash::MetroHash64;
use snafu::prelude::*;
use tracing::{debug, info, warn};

use crate::ext::BestEffortPathExt;

const SESSION_FILE_PATH: &str = ".pathtree/session.bin";
const SESSION_VERSION: u32 = 1;
const COMPRESSION_LEVEL: i32 = 3;

pub fn get_session_file_path(root: &Path) -> PathBuf {
    root.join(SESSION_FILE_PATH)
}

/// Fingerprint of a path list. Order sensitive.
pub fn fingerprint_paths<S: AsRef<str>>(paths: &[S]) -> u64 {
    let mut hasher = MetroHash64::default();
    for path in paths {
        hasher.write(path.as_ref().as_bytes());
        hasher.write_u8(b'\n');
    }
    hasher.finish()
}

/// Tree state saved between runs.
///
/// `expanded` holds every expanded path, including ones hidden under a
/// collapsed ancestor.
#[derive(Debug, Clone, PartialEq, Eq, Default, Encode, Decode)]
pub struct Session {
    version: u32,
    pub fingerprint: u64,
    pub expanded: Vec<String>,
    pub selected: Vec<String>,
}

impl Session {
    pub fn new(fingerprint: u64, expanded: Vec<String>, selected: Vec<String>) -> Self {
        Self {
            version: SESSION_VERSION,
            fingerprint,
            expanded,
            selected,
        }
    }

    pub fn matches(&self, fingerprint: u64) -> bool {
        self.fingerprint == fingerprint
    }

    /// Reads the session stored under `root`. A missing or unusable file yields `None`.
    pub async fn read(root: &Path) -> Option<Self> {
        let path = get_session_file_path(root);
        debug!("Reading session from {}", path.best_effort_path_display());
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(_) => {
                info!("No existing session found, starting fresh");
                return None;
            }
        };
        match Self::decode(&bytes) {
            Ok(session) => {
                debug!(
                    "Loaded session: {} expanded, {} selected",
                    session.expanded.len(),
                    session.selected.len()
                );
                Some(session)
            }
            Err(error) => {
                warn!("Ignoring unreadable session: {error}");
                None
            }
        }
    }

    pub async fn write(&self, root: &Path) -> Result<(), SessionStoreError> {
        let path = get_session_file_path(root);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.context(CreateDirSnafu {
                path: parent.to_path_buf(),
            })?;
        }
        let bytes = self.encode()?;
        fs::write(&path, bytes)
            .await
            .0
            .context(WriteSnafu { path: path.clone() })?;
        debug!("Saved session to {}", path.best_effort_path_display());
        Ok(())
    }

    pub fn encode(&self) -> Result<Vec<u8>, SessionStoreError> {
        let encoded =
            bincode::encode_to_vec(self, bincode::config::standard()).context(EncodeSnafu)?;
        zstd::encode_all(encoded.as_slice(), COMPRESSION_LEVEL).context(CompressSnafu)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, SessionStoreError> {
        let decompressed = zstd::decode_all(bytes).context(DecompressSnafu)?;
        let (session, _): (Self, usize) =
            bincode::decode_from_slice(&decompressed, bincode::config::standard())
                .context(DecodeSnafu)?;
        ensure!(
            session.version == SESSION_VERSION,
            VersionMismatchSnafu {
                found: session.version,
            }
        );
        Ok(session)
    }
}

#[derive(Debug, Snafu)]
pub enum SessionStoreError {
    #[snafu(display("Failed to create session directory {}", path.best_effort_path_display()))]
    CreateDirError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to write session file {}", path.best_effort_path_display()))]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to encode session"))]
    EncodeError {
        source: bincode::error::EncodeError,
    },
    #[snafu(display("Failed to compress session"))]
    CompressError { source: std::io::Error },
    #[snafu(display("Failed to decompress session"))]
    DecompressError { source: std::io::Error },
    #[snafu(display("Failed to decode session"))]
    DecodeError {
        source: bincode::error::DecodeError,
    },
    #[snafu(display("Session version {} is not supported", found))]
    VersionMismatch { found: u32 },
}
