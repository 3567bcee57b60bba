//! Output-directory and atomic-write helpers.
//!
//! Result files are written to a `.tmp` sibling and renamed into place, so
//! an interrupted run never leaves a partial artifact under the final name.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::Path;
use tracing::info;

pub fn ensure_dir(dir: &Path) -> io::Result<()> {
    if !dir.as_os_str().is_empty() && !dir.exists() {
        fs::create_dir_all(dir)?;
        info!(directory = %dir.display(), "created output directory");
    }
    Ok(())
}

pub fn write_atomic(path: &Path, contents: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut tmp_name = OsString::from(path.as_os_str());
    tmp_name.push(".tmp");
    let tmp = Path::new(&tmp_name);
    fs::write(tmp, contents)?;
    fs::rename(tmp, path)
}
