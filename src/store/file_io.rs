//! Locked whole-file read/write shared by the stores.
//!
//! Locks are scoped to a single call. They guard against a `watch` process and
//! a CLI invocation touching the same file, not against in-process races.

use std::{io::ErrorKind, path::Path};

use fs4::tokio::AsyncFileExt;
use tokio::{
    fs::File,
    io::{AsyncReadExt, AsyncWriteExt},
};

use crate::error::PersistenceError;

fn io_error(path: &Path, source: std::io::Error) -> PersistenceError {
    PersistenceError::Io {
        path: path.to_owned(),
        source,
    }
}

/// Reads the whole file under a shared lock. A missing file yields `None`.
pub(super) async fn read_locked(path: &Path) -> Result<Option<String>, PersistenceError> {
    let mut file = match File::open(path).await {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(io_error(path, e)),
    };

    // Semi-safe acquire-release for the file
    file.lock_shared().map_err(|e| io_error(path, e))?;
    let mut contents = String::new();
    let result = file.read_to_string(&mut contents).await;
    file.unlock_async().await.map_err(|e| io_error(path, e))?;

    result.map_err(|e| io_error(path, e))?;
    Ok(Some(contents))
}

/// Replaces the file contents under an exclusive lock.
pub(super) async fn write_locked(path: &Path, contents: &[u8]) -> Result<(), PersistenceError> {
    let mut file = File::options()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .await
        .map_err(|e| io_error(path, e))?;

    file.lock_exclusive().map_err(|e| io_error(path, e))?;
    let result = write_with_file(&mut file, contents).await;
    file.unlock_async().await.map_err(|e| io_error(path, e))?;

    result.map_err(|e| io_error(path, e))
}

async fn write_with_file(file: &mut File, contents: &[u8]) -> std::io::Result<()> {
    file.write_all(contents).await?;
    file.flush().await?;
    Ok(())
}
