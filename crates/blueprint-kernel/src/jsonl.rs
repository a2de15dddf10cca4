//! JSONL declaration snapshots: one declaration per line.

use crate::declaration::Declaration;
use crate::error::JsonlError;
use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

/// Read declarations from a JSONL reader. Blank lines and `#` comments are skipped.
pub fn read_declarations(reader: impl BufRead) -> Result<Vec<Declaration>, JsonlError> {
    let mut declarations = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| JsonlError::Io(line_no + 1, e.to_string()))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let decl: Declaration = serde_json::from_str(trimmed)
            .map_err(|e| JsonlError::Parse(line_no + 1, e.to_string()))?;
        declarations.push(decl);
    }
    Ok(declarations)
}

/// Write declarations to a JSONL writer.
pub fn write_declarations(
    writer: &mut impl Write,
    declarations: &[Declaration],
) -> Result<(), JsonlError> {
    for decl in declarations {
        let line = serde_json::to_string(decl).map_err(|e| JsonlError::Serialize(e.to_string()))?;
        writeln!(writer, "{line}").map_err(|e| JsonlError::Io(0, e.to_string()))?;
    }
    Ok(())
}

/// Read declarations from a JSONL file path.
pub fn read_declarations_from_path(path: impl AsRef<Path>) -> Result<Vec<Declaration>, JsonlError> {
    let path = path.as_ref();
    let bytes =
        fs::read(path).map_err(|e| JsonlError::Io(0, format!("{}: {e}", path.display())))?;
    read_declarations(BufReader::new(bytes.as_slice()))
}
