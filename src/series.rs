//! Benchmark history input
//!
//! A history file holds one sample per line, oldest run first. Blank lines
//! and lines starting with `#` are ignored, so result dumps can carry
//! revision annotations.

use anyhow::{Context, Result};
use std::fs;
use std::io::Read;
use std::path::Path;

/// Parse a history from text
///
/// # Example
/// ```
/// use breakout::series::parse_series;
///
/// let series = parse_series("# go-build wall time\n10.2\n10.4\n\n9.9\n").unwrap();
/// assert_eq!(series, vec![10.2, 10.4, 9.9]);
/// ```
pub fn parse_series(content: &str) -> Result<Vec<f64>> {
    let mut samples = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let value: f64 = line
            .parse()
            .with_context(|| format!("line {}: invalid sample {:?}", idx + 1, line))?;
        samples.push(value);
    }

    Ok(samples)
}

/// Read a history from a file, or from stdin when `path` is `-`
pub fn read_series<P: AsRef<Path>>(path: P) -> Result<Vec<f64>> {
    let path = path.as_ref();

    let content = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read history from stdin")?;
        buf
    } else {
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?
    };

    parse_series(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Benchmark name for a history path (file stem, `stdin` for `-`)
pub fn series_name<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();
    if path == Path::new("-") {
        return "stdin".to_string();
    }

    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let series = parse_series("1\n  2.5  \n# rev abc123\n\n-3e2\n").unwrap();
        assert_eq!(series, vec![1.0, 2.5, -300.0]);
    }

    #[test]
    fn test_parse_reports_line_number() {
        let err = parse_series("1.0\n2.0\nfast\n").unwrap_err();
        assert!(err.to_string().contains("line 3"));
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse_series("").unwrap().is_empty());
    }

    #[test]
    fn test_read_series_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "10.0\n11.0\n12.0").unwrap();

        assert_eq!(read_series(file.path()).unwrap(), vec![10.0, 11.0, 12.0]);
    }

    #[test]
    fn test_read_series_missing_file() {
        let err = read_series("/nonexistent/history.txt").unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }

    #[test]
    fn test_series_name() {
        assert_eq!(series_name("results/go-build.txt"), "go-build");
        assert_eq!(series_name("-"), "stdin");
    }
}
