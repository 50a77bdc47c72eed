//! Temporary locations for downloaded installers. Paths are never relative,
//! so artifacts never land under the current working directory (e.g. when
//! TMPDIR=tmp).

use std::env;
use std::io;
use std::path::PathBuf;

use tempfile::NamedTempFile;

/// Returns an absolute directory suitable for temporary files.
pub fn temp_dir_base() -> PathBuf {
    let t = env::temp_dir();
    if t.is_absolute() {
        t
    } else {
        #[cfg(windows)]
        {
            env::var("TEMP")
                .or_else(|_| env::var("TMP"))
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("C:\\Windows\\Temp"))
        }
        #[cfg(not(windows))]
        {
            PathBuf::from("/tmp")
        }
    }
}

/// Create an empty installer artifact that is deleted when dropped.
///
/// The extension is kept so platforms that dispatch on it (`.exe`, `.msi`)
/// can still run the file.
pub fn installer_artifact(extension: &str) -> io::Result<NamedTempFile> {
    let suffix = if extension.is_empty() {
        String::new()
    } else {
        format!(".{extension}")
    };
    tempfile::Builder::new()
        .prefix("channelsync-installer-")
        .suffix(&suffix)
        .tempfile_in(temp_dir_base())
}
