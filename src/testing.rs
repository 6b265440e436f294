//! Fixture helpers for testing against real files.
//!
//! This module provides temporary files and directories that clean up on
//! drop, plus small helpers for writing line fixtures and asserting on
//! written output.

use std::path::{Path, PathBuf};

use tempfile::{NamedTempFile, TempDir};

/// A temporary file that is automatically deleted when dropped.
pub struct TempFilePath {
    #[allow(dead_code)]
    temp_file: NamedTempFile,
    path: PathBuf,
}

impl TempFilePath {
    /// Create a new temporary file.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary file cannot be created.
    pub fn new() -> std::io::Result<Self> {
        let temp_file = NamedTempFile::new()?;
        let path = temp_file.path().to_path_buf();
        Ok(Self { temp_file, path })
    }

    /// Create a new temporary file with a specific extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary file cannot be created.
    pub fn with_extension(extension: &str) -> std::io::Result<Self> {
        let temp_file = tempfile::Builder::new()
            .suffix(&format!(".{extension}"))
            .tempfile()?;
        let path = temp_file.path().to_path_buf();
        Ok(Self { temp_file, path })
    }

    /// Get the path to the temporary file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for TempFilePath {
    fn default() -> Self {
        Self::new().expect("Failed to create temporary file")
    }
}

/// A temporary directory that is automatically deleted when dropped.
pub struct TempDirPath {
    #[allow(dead_code)]
    temp_dir: TempDir,
    path: PathBuf,
}

impl TempDirPath {
    /// Create a new temporary directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary directory cannot be created.
    pub fn new() -> std::io::Result<Self> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().to_path_buf();
        Ok(Self { temp_dir, path })
    }

    /// Get the path to the temporary directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create a file path within this directory.
    #[must_use]
    pub fn file_path(&self, filename: &str) -> PathBuf {
        self.path.join(filename)
    }
}

impl Default for TempDirPath {
    fn default() -> Self {
        Self::new().expect("Failed to create temporary directory")
    }
}

/// Create a temporary file holding `content` verbatim.
///
/// # Errors
///
/// Returns an error if the temporary file cannot be created or written.
///
/// # Example
///
/// ```
/// use rowbind::testing::mock_text_file;
///
/// let temp = mock_text_file("name,age\nada,36\n").unwrap();
/// // Use temp.path() as a session source
/// ```
pub fn mock_text_file(content: &str) -> std::io::Result<TempFilePath> {
    let temp = TempFilePath::new()?;
    std::fs::write(temp.path(), content)?;
    Ok(temp)
}

/// Read a written file back as lines, for assertions.
///
/// # Errors
///
/// Returns an error if the read operation fails.
pub fn read_lines_output(path: impl AsRef<Path>) -> std::io::Result<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    Ok(content.lines().map(str::to_owned).collect())
}

/// Assert that a written file contains exactly the expected lines.
///
/// # Panics
///
/// Panics if the assertion fails.
pub fn assert_lines_equals(path: impl AsRef<Path>, expected: &[&str]) {
    let actual = read_lines_output(path).expect("Failed to read output file");
    assert_eq!(
        actual.len(),
        expected.len(),
        "line count mismatch:\n  Expected: {} lines\n  Actual: {} lines",
        expected.len(),
        actual.len()
    );
    for (i, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
        assert_eq!(a, e, "line mismatch at index {i}:\n  Expected: {e:?}\n  Actual: {a:?}");
    }
}
