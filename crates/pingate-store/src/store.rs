//! The file store: load-once, flush-after-every-mutation persistence.

use std::fs;
use std::path::PathBuf;

use pingate_protocol::{Codec, CredentialTable, JsonCodec, LoginAnchor};

use crate::StoreError;

/// File name of the credential table within the data directory.
pub const PLAYERS_FILE: &str = "players.json";

/// File name of the login anchor within the data directory.
pub const ANCHOR_FILE: &str = "loginloc.json";

/// Reads and writes the gate's persisted records under a data
/// directory.
///
/// Generic over the [`Codec`] so the on-disk format is swappable;
/// [`GateStore::new`] picks [`JsonCodec`], which is what the default
/// file names assume.
///
/// Absence semantics: a missing `players.json` loads as an empty table
/// and a missing `loginloc.json` loads as `None` — a fresh data
/// directory is a valid, empty state.
pub struct GateStore<C: Codec = JsonCodec> {
    dir: PathBuf,
    codec: C,
}

impl GateStore<JsonCodec> {
    /// Creates a store over `dir` using the JSON codec.
    ///
    /// The directory doesn't need to exist yet; the first save creates
    /// it.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_codec(dir, JsonCodec)
    }
}

impl<C: Codec> GateStore<C> {
    /// Creates a store over `dir` with a custom codec.
    pub fn with_codec(dir: impl Into<PathBuf>, codec: C) -> Self {
        Self {
            dir: dir.into(),
            codec,
        }
    }

    /// The data directory this store reads and writes.
    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    /// Loads the credential table, or an empty one if the file doesn't
    /// exist.
    ///
    /// # Errors
    /// I/O failures other than "not found", or a file that doesn't
    /// parse.
    pub fn load_credentials(&self) -> Result<CredentialTable, StoreError> {
        let path = self.dir.join(PLAYERS_FILE);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(?path, "no credential file, starting empty");
                return Ok(CredentialTable::new());
            }
            Err(e) => return Err(e.into()),
        };
        let table: CredentialTable = self.codec.decode(&bytes)?;
        tracing::info!(players = table.len(), "credential table loaded");
        Ok(table)
    }

    /// Writes the full credential table atomically.
    pub fn save_credentials(
        &self,
        table: &CredentialTable,
    ) -> Result<(), StoreError> {
        let bytes = self.codec.encode(table)?;
        self.write_atomic(PLAYERS_FILE, &bytes)?;
        tracing::debug!(players = table.len(), "credential table flushed");
        Ok(())
    }

    /// Loads the login anchor, or `None` if it was never set.
    pub fn load_anchor(&self) -> Result<Option<LoginAnchor>, StoreError> {
        let path = self.dir.join(ANCHOR_FILE);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(?path, "no anchor file");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        let anchor: LoginAnchor = self.codec.decode(&bytes)?;
        tracing::info!(world = %anchor.world, "login anchor loaded");
        Ok(Some(anchor))
    }

    /// Writes the login anchor atomically.
    pub fn save_anchor(&self, anchor: &LoginAnchor) -> Result<(), StoreError> {
        let bytes = self.codec.encode(anchor)?;
        self.write_atomic(ANCHOR_FILE, &bytes)?;
        tracing::debug!(world = %anchor.world, "login anchor flushed");
        Ok(())
    }

    /// Writes `bytes` to `name` inside the data directory via a temp
    /// file and rename, so readers never observe a half-written file.
    fn write_atomic(&self, name: &str, bytes: &[u8]) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(name);
        let tmp = self.dir.join(format!("{name}.tmp"));
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

// =========================================================================
// Tests
// =========================================================================
