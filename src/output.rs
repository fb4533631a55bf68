//! Output files that appear under their final name only once complete

use std::io;
use std::path::Path;
use tempfile::NamedTempFile;

/// Directory an output file will be created in
pub fn output_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Temporary file next to `path`, to be persisted over it when complete
pub fn staging_file(path: &Path) -> io::Result<NamedTempFile> {
    NamedTempFile::new_in(output_dir(path))
}
