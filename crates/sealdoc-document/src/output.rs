// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Output files: unique document names and write-then-rename persistence.

use std::io::Write;
use std::path::{Path, PathBuf};

use sealdoc_core::error::{Result, SealdocError};
use tracing::{debug, instrument};

/// `dir/document_<8 hex>.pdf`, named from a fresh v4 UUID.
pub fn unique_document_path(dir: &Path) -> PathBuf {
    let id = uuid::Uuid::new_v4().simple().to_string();
    dir.join(format!("document_{}.pdf", &id[..8]))
}

/// Write `bytes` to `path` through a temp file in the same directory.
///
/// The destination only appears (or is replaced) once every byte has been
/// written and flushed.
#[instrument(skip(bytes), fields(path = %path.display(), len = bytes.len()))]
pub fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut temp = tempfile::NamedTempFile::new_in(dir)?;
    temp.write_all(bytes)?;
    temp.as_file().sync_all()?;
    temp.persist(path)
        .map_err(|err| SealdocError::Io(err.error))?;

    debug!("Output persisted");
    Ok(())
}
