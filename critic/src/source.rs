//! Reading source files into the editor.

use std::path::Path;

use tracing::{info, warn};

/// Extensions the analysis service is known to handle.
pub const SUPPORTED_EXTENSIONS: [&str; 5] = ["py", "java", "c", "cpp", "txt"];

/// Reads `path` as text. Invalid UTF-8 is replaced rather than rejected, and files
/// with an unusual extension are loaded anyway with a warning.
pub fn read_source(path: &Path) -> std::io::Result<String> {
    let bytes = std::fs::read(path)?;
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    if !ext
        .as_deref()
        .is_some_and(|e| SUPPORTED_EXTENSIONS.contains(&e))
    {
        warn!(path = %path.display(), "unsupported file extension, loading anyway");
    }
    info!(path = %path.display(), bytes = bytes.len(), "read source file");
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_text_and_replaces_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("main.py");
        std::fs::write(&path, b"print('hi')\n\xff").unwrap();
        assert_eq!(read_source(&path).unwrap(), "print('hi')\n\u{fffd}");
    }

    #[test]
    fn unusual_extension_still_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("script.rb");
        std::fs::write(&path, "puts 1").unwrap();
        assert_eq!(read_source(&path).unwrap(), "puts 1");
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_source(&dir.path().join("gone.c")).is_err());
    }
}
