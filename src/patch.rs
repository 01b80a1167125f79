use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use regex::{NoExpand, Regex};
use thiserror::Error;

/// The fundamental patch primitive: a single regex substitution with an
/// exact-match-count gate.
///
/// The file is scanned for every occurrence of the pattern before anything is
/// replaced. Unless exactly one occurrence exists, the patch refuses to apply
/// and the file is left byte-for-byte unchanged. The gate is the only safety
/// mechanism; there is no backup or rollback.
#[derive(Debug, Clone)]
#[must_use = "RegexPatch does nothing until apply() is called"]
pub struct RegexPatch {
    /// Path to the file to patch
    pub file: PathBuf,
    /// Pattern locating the block to replace (compiled with dot-matches-newline)
    pub pattern: Regex,
    /// Literal replacement text (no back-references, inserted verbatim)
    pub replacement: String,
}

/// Record of a successfully applied patch.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "Applied should be reported to the caller"]
pub struct Applied {
    pub file: PathBuf,
    /// Length in bytes of the text that was replaced
    pub bytes_replaced: usize,
}

#[derive(Error, Debug)]
pub enum PatchError {
    #[error("pattern matched {count} locations in {} (expected exactly 1)", file.display())]
    MatchCount { file: PathBuf, count: usize },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not valid UTF-8: {source}", path.display())]
    Utf8 {
        path: PathBuf,
        #[source]
        source: std::str::Utf8Error,
    },

    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl RegexPatch {
    pub fn new(
        file: impl Into<PathBuf>,
        pattern: Regex,
        replacement: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            pattern,
            replacement: replacement.into(),
        }
    }

    /// Read the target file and compute the patched text without writing.
    ///
    /// Returns `(original, patched)`. Fails on the same conditions as
    /// [`apply`](Self::apply): I/O errors, invalid UTF-8, or a match count
    /// other than exactly 1.
    pub fn preview(&self) -> Result<(String, String), PatchError> {
        let bytes = fs::read(&self.file).map_err(|source| PatchError::Io {
            path: self.file.clone(),
            source,
        })?;
        let original = std::str::from_utf8(&bytes).map_err(|source| PatchError::Utf8 {
            path: self.file.clone(),
            source,
        })?;

        // Count every occurrence before touching anything. A duplicated block
        // must be reported as ambiguous, not silently first-match patched.
        let count = self.pattern.find_iter(original).count();
        if count != 1 {
            return Err(PatchError::MatchCount {
                file: self.file.clone(),
                count,
            });
        }

        let patched = self
            .pattern
            .replacen(original, 1, NoExpand(&self.replacement))
            .into_owned();

        Ok((original.to_string(), patched))
    }

    /// Apply the patch: substitute the single match and persist the result.
    ///
    /// The write only happens after the match-count gate has passed; on any
    /// failure the file on disk is unchanged. The write itself is atomic
    /// (tempfile in the target's directory, fsync, rename).
    pub fn apply(&self) -> Result<Applied, PatchError> {
        let (original, patched) = self.preview()?;

        // preview() guaranteed exactly one match
        let matched = self
            .pattern
            .find(&original)
            .map(|m| m.len())
            .unwrap_or_default();

        atomic_write(&self.file, patched.as_bytes()).map_err(|source| PatchError::Io {
            path: self.file.clone(),
            source,
        })?;

        Ok(Applied {
            file: self.file.clone(),
            bytes_replaced: matched,
        })
    }
}

/// Atomic file write: tempfile + fsync + rename.
///
/// Either the full write succeeds or the previous content survives; a crash
/// mid-write cannot leave the target truncated.
fn atomic_write(path: &Path, content: &[u8]) -> Result<(), std::io::Error> {
    // Tempfile in the same directory so the rename stays on one filesystem
    let parent = path.parent().filter(|p| !p.as_os_str().is_empty()).ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "path has no parent directory",
        )
    })?;

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    temp.write_all(content)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;

    Ok(())
}
