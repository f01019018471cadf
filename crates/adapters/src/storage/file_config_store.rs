//! Filesystem-backed configuration store.
//!
//! The store keeps two files in its directory: `version`, whose exact
//! bytes identify the persisted format, and `rules`, a 4-byte
//! big-endian length prefix followed by the JSON document. The length
//! prefix lets a truncated write be detected on restore.

use std::fs;
use std::io::Read;
use std::path::PathBuf;

use tracing::debug;

use domain::firewall::error::FirewallError;
use ports::secondary::config_store::ConfigStorePort;

/// Bytes identifying the current persisted format. Changing the
/// document layout requires a new tag.
pub const VERSION_TAG: &[u8] = b"edgewall-fw-1";

const VERSION_FILE: &str = "version";
const RULES_FILE: &str = "rules";

pub struct FileConfigStore {
    dir: PathBuf,
    max_document_bytes: usize,
}

impl FileConfigStore {
    pub fn new(dir: impl Into<PathBuf>, max_document_bytes: usize) -> Self {
        Self {
            dir: dir.into(),
            max_document_bytes,
        }
    }

    fn version_path(&self) -> PathBuf {
        self.dir.join(VERSION_FILE)
    }

    fn rules_path(&self) -> PathBuf {
        self.dir.join(RULES_FILE)
    }
}

impl ConfigStorePort for FileConfigStore {
    fn save(&self, document: &serde_json::Value) -> Result<(), FirewallError> {
        let encoded =
            serde_json::to_vec(document).map_err(|e| FirewallError::Encode(e.to_string()))?;
        if encoded.len() > self.max_document_bytes {
            return Err(FirewallError::OversizedConfig {
                size: encoded.len(),
                max: self.max_document_bytes,
            });
        }

        fs::create_dir_all(&self.dir)?;
        fs::write(self.version_path(), VERSION_TAG)?;

        #[allow(clippy::cast_possible_truncation)]
        let len = encoded.len() as u32;
        let mut framed = Vec::with_capacity(4 + encoded.len());
        framed.extend_from_slice(&len.to_be_bytes());
        framed.extend_from_slice(&encoded);
        fs::write(self.rules_path(), framed)?;

        debug!(bytes = encoded.len(), dir = %self.dir.display(), "configuration saved");
        Ok(())
    }

    fn restore(&self) -> Result<serde_json::Value, FirewallError> {
        let version = match fs::read(self.version_path()) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(FirewallError::NotFound);
            }
            Err(e) => return Err(e.into()),
        };
        if version != VERSION_TAG {
            return Err(FirewallError::VersionMismatch {
                expected: String::from_utf8_lossy(VERSION_TAG).into_owned(),
                found: String::from_utf8_lossy(&version).into_owned(),
            });
        }

        let mut file = match fs::File::open(self.rules_path()) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(FirewallError::NotFound);
            }
            Err(e) => return Err(e.into()),
        };

        let mut len_bytes = [0u8; 4];
        file.read_exact(&mut len_bytes)
            .map_err(|e| FirewallError::Decode(format!("length prefix: {e}")))?;
        let len = u32::from_be_bytes(len_bytes) as usize;
        if len > self.max_document_bytes {
            return Err(FirewallError::OversizedConfig {
                size: len,
                max: self.max_document_bytes,
            });
        }

        let mut encoded = vec![0u8; len];
        file.read_exact(&mut encoded)
            .map_err(|e| FirewallError::Decode(format!("truncated document: {e}")))?;

        let document = serde_json::from_slice(&encoded)
            .map_err(|e| FirewallError::Decode(e.to_string()))?;
        debug!(bytes = len, dir = %self.dir.display(), "configuration restored");
        Ok(document)
    }
}
