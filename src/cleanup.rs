use crate::error::Result;
use std::fs;
use std::path::Path;

/// Removes everything inside `dir`, keeping `dir` itself.
///
/// `keep` is a canonical directory that survives together with its
/// ancestors when it lies inside `dir`, so an output directory nested in the
/// input directory is never emptied. Returns the number of entries removed.
pub fn clean_input_dir(dir: &Path, keep: Option<&Path>) -> Result<usize> {
    let mut removed = 0;

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            if let Some(keep) = keep {
                let canonical = path.canonicalize()?;
                if canonical == keep {
                    continue;
                }
                if keep.starts_with(&canonical) {
                    removed += clean_input_dir(&path, Some(keep))?;
                    continue;
                }
            }
            fs::remove_dir_all(&path)?;
        } else {
            fs::remove_file(&path)?;
        }
        removed += 1;
    }

    Ok(removed)
}
