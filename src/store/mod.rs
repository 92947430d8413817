pub mod prefixes;
pub mod triggers;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::{fs, io};
use thiserror::Error;
use tracing::warn;

/// Longest allowed guild command prefix, in characters.
pub const MAX_PREFIX_LEN: usize = 5;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("prefix cannot be longer than {MAX_PREFIX_LEN} characters")]
    PrefixTooLong,
}

fn io_err(path: &Path, source: io::Error) -> StoreError {
    StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Load a JSON document, substituting (and re-persisting) an empty table when
/// the file is missing or does not parse.
pub(crate) fn load_or_init<T>(path: &Path) -> Result<T, StoreError>
where
    T: DeserializeOwned + Serialize + Default,
{
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }

    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            let empty = T::default();
            save_atomic(path, &empty)?;
            return Ok(empty);
        }
        Err(e) => return Err(io_err(path, e)),
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Ok(value),
        Err(e) => {
            warn!(
                "{} is not valid JSON ({e}); starting with an empty table",
                path.display()
            );
            let empty = T::default();
            save_atomic(path, &empty)?;
            Ok(empty)
        }
    }
}

/// Rewrite the whole document through a temp file and rename, so a crash
/// mid-write cannot truncate the live file.
pub(crate) fn save_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(value).map_err(|e| StoreError::Encode {
        path: path.to_path_buf(),
        source: e,
    })?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).map_err(|e| io_err(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| io_err(path, e))?;
    Ok(())
}
