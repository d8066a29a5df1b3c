//! Plain-text trace ingestion.
//!
//! A trace holds one execution time per whitespace-separated token; `#`
//! starts a comment that runs to the end of the line.

use std::path::Path;

use crate::error::TraceError;

/// Parse a trace from a string.
pub fn parse_trace(text: &str) -> Result<Vec<f64>, TraceError> {
    let mut values = Vec::new();
    for (number, line) in text.lines().enumerate() {
        let content = line.split('#').next().unwrap_or("");
        for token in content.split_whitespace() {
            match token.parse::<f64>() {
                Ok(v) if v.is_finite() => values.push(v),
                _ => {
                    return Err(TraceError::Parse {
                        line: number + 1,
                        token: token.to_string(),
                    })
                }
            }
        }
    }
    Ok(values)
}

/// Read and parse a trace file.
pub fn read_trace(path: impl AsRef<Path>) -> Result<Vec<f64>, TraceError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| TraceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_trace(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_with_comments() {
        let text = "# header\n1.5 2  3e1\n\n4 # trailing\n";
        assert_eq!(parse_trace(text).unwrap(), vec![1.5, 2.0, 30.0, 4.0]);
    }

    #[test]
    fn test_parse_error_reports_line() {
        let err = parse_trace("1 2\n3 x4\n").unwrap_err();
        match err {
            TraceError::Parse { line, token } => {
                assert_eq!(line, 2);
                assert_eq!(token, "x4");
            }
            other => panic!("unexpected error: {}", other),
        }
        assert!(parse_trace("inf").is_err());
    }

    #[test]
    fn test_read_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "10 11 12").unwrap();
        writeln!(file, "13").unwrap();
        assert_eq!(read_trace(file.path()).unwrap(), vec![10.0, 11.0, 12.0, 13.0]);
    }

    #[test]
    fn test_missing_file() {
        let err = read_trace("/nonexistent/trace.txt").unwrap_err();
        assert!(matches!(err, TraceError::Io { .. }));
    }
}
