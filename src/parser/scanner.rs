//! Source file reading.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Read a source file as physical lines
///
/// Bytes that are not valid UTF-8 are replaced rather than rejected, so
/// legacy Latin-1 comments do not abort a build.
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    let bytes = fs::read(path).map_err(|source| Error::SourceRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(split_lines(&String::from_utf8_lossy(&bytes)))
}

/// Split text into lines, accepting both `\n` and `\r\n`
#[must_use]
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_split_lines_crlf() {
        assert_eq!(split_lines("a\r\nb\nc"), vec!["a", "b", "c"]);
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn test_read_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "module m\r\nend module m\n").unwrap();
        let lines = read_lines(file.path()).unwrap();
        assert_eq!(lines, vec!["module m", "end module m"]);
    }

    #[test]
    fn test_read_lines_invalid_utf8() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"! caf\xe9\nx = 1\n").unwrap();
        let lines = read_lines(file.path()).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "x = 1");
    }

    #[test]
    fn test_missing_file_names_path() {
        let err = read_lines(Path::new("/nonexistent/dir/missing.f90")).unwrap_err();
        assert!(matches!(err, Error::SourceRead { .. }));
        assert!(err.to_string().contains("missing.f90"));
    }
}
