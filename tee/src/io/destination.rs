//! Opening the destination file.

use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind;
use std::path::Path;

use tracing::{debug, instrument, warn};

use crate::error::{IoError, Result, TeeError};

/// Open `path` for writing.
///
/// Without `append` any existing file is removed first and a fresh one is
/// created. With `append` the file is opened for appending and created if
/// absent. An empty path is rejected before touching the filesystem.
#[instrument(skip_all, fields(path = %path.display(), append = append))]
pub fn open_destination(path: &Path, append: bool) -> Result<File> {
    if path.as_os_str().is_empty() {
        return Err(TeeError::invalid_argument("empty destination path"));
    }

    if !append {
        match fs::remove_file(path) {
            Ok(()) => debug!("removed existing destination"),
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            // Open reports anything that actually matters.
            Err(err) => warn!(err = %err, "could not remove existing destination"),
        }
    }

    let mut options = OpenOptions::new();
    options.write(true).create(true);
    if append {
        options.append(true);
    } else {
        options.truncate(true);
    }

    let file = options.open(path).map_err(|source| IoError::CannotOpen {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("opened destination");
    Ok(file)
}
