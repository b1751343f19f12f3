//! JSON I/O handling for CLI
//!
//! - Input: a JSON file holding one array of records
//! - Output: a single JSON object on stdout
//! - UTF-8 only

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde_json::Value;

use super::errors::{CliError, CliResult};

/// Read a JSON array of records from a file
pub fn read_records(path: &Path) -> CliResult<Vec<Value>> {
    let content = fs::read_to_string(path)
        .map_err(|e| CliError::io_error(format!("Failed to read {}: {}", path.display(), e)))?;

    match serde_json::from_str(&content) {
        Ok(Value::Array(records)) => Ok(records),
        Ok(_) => Err(CliError::invalid_records(format!(
            "{} must contain a JSON array of records",
            path.display()
        ))),
        Err(e) => Err(CliError::invalid_records(format!(
            "Invalid JSON in {}: {}",
            path.display(),
            e
        ))),
    }
}

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "ok",
        "data": data
    });

    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, &response)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}

/// Write an error response to stdout
pub fn write_error(code: &str, message: &str) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "error",
        "code": code,
        "message": message
    });

    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, &response)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::errors::CliErrorCode;
    use tempfile::TempDir;

    #[test]
    fn test_read_records() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("calls.json");
        fs::write(&path, r#"[{"id": "c1"}, {"id": "c2"}]"#).unwrap();

        let records = read_records(&path).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_read_records_rejects_non_array() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("calls.json");
        fs::write(&path, r#"{"id": "c1"}"#).unwrap();

        let err = read_records(&path).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::InvalidRecords);

        let err = read_records(&tmp.path().join("absent.json")).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::IoError);
    }
}
