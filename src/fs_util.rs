//! Small filesystem helpers shared by settings and report downloads.

use std::io::{self, Write};
use std::path::Path;

use rand::TryRngCore;

/// Write `data` to `path` through a sibling temp file and a rename, so a crash
/// never leaves a half-written file behind.
pub(crate) fn atomic_write(path: &Path, data: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?;

    let mut last_err = None;
    for _ in 0..5 {
        let tmp_path = dir.join(format!(
            "{}.tmp-{}",
            file_name.to_string_lossy(),
            random_suffix()?
        ));
        let mut file = match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&tmp_path)
        {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                last_err = Some(err);
                continue;
            }
            Err(err) => return Err(err),
        };
        let written = file.write_all(data).and_then(|_| file.sync_all());
        drop(file);
        if let Err(err) = written.and_then(|_| replace_file(&tmp_path, path)) {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(err);
        }
        return Ok(());
    }
    Err(last_err.unwrap_or_else(|| {
        io::Error::new(io::ErrorKind::AlreadyExists, "no free temporary file name")
    }))
}

fn random_suffix() -> io::Result<String> {
    let mut bytes = [0u8; 6];
    rand::rngs::OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|err| io::Error::other(format!("failed to generate temp suffix: {err}")))?;
    Ok(bytes.iter().map(|b| format!("{b:02x}")).collect())
}

fn replace_file(temp_path: &Path, path: &Path) -> io::Result<()> {
    match std::fs::rename(temp_path, path) {
        Ok(()) => Ok(()),
        #[cfg(target_os = "windows")]
        Err(err)
            if err.kind() == io::ErrorKind::AlreadyExists
                || err.kind() == io::ErrorKind::PermissionDenied =>
        {
            match std::fs::remove_file(path) {
                Ok(()) => std::fs::rename(temp_path, path),
                Err(inner) if inner.kind() == io::ErrorKind::NotFound => {
                    std::fs::rename(temp_path, path)
                }
                Err(_) => Err(err),
            }
        }
        Err(err) => Err(err),
    }
}
