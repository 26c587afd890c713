//! CSV reading for laboratory exports.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use amr_standards::ReferenceTables;
use polars::prelude::*;
use tracing::{debug, info};

use crate::error::{IngestError, Result};

/// Read the header row, BOM stripped and names trimmed.
pub fn read_csv_headers(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path).map_err(|e| IngestError::open(path, e))?;
    let mut first = String::new();
    BufReader::new(file)
        .read_line(&mut first)
        .map_err(|e| IngestError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
    let line = first.strip_prefix('\u{feff}').unwrap_or(&first).trim_end();
    if line.trim().is_empty() {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    }
    Ok(parse_header_line(line))
}

/// Split one CSV line, honouring double quotes and `""` escapes.
fn parse_header_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if !in_quotes => in_quotes = true,
            '"' => {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            ',' if !in_quotes => {
                fields.push(clean_header(&current));
                current.clear();
            }
            _ => current.push(c),
        }
    }
    fields.push(clean_header(&current));
    fields
}

/// Load a laboratory export with every column read as text.
///
/// Identifying columns named in the reference tables are dropped here so the
/// returned frame never carries them.
pub fn read_case_table(path: &Path, tables: &ReferenceTables) -> Result<DataFrame> {
    // Surfaces FileNotFound and EmptyCsv before Polars does.
    read_csv_headers(path)?;

    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let cleaned: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| clean_header(name.as_str()))
        .collect();
    df.set_column_names(cleaned)?;

    let mut dropped = Vec::new();
    for name in &tables.columns().identifying {
        if df.get_column_index(name).is_some() {
            df = df.drop(name)?;
            dropped.push(name.as_str());
        }
    }
    if !dropped.is_empty() {
        debug!(columns = ?dropped, "dropped identifying columns");
    }

    info!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "loaded case table"
    );
    Ok(df)
}

fn clean_header(name: &str) -> String {
    name.trim_start_matches('\u{feff}').trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_header_line_quoted() {
        assert_eq!(
            parse_header_line(r#"Nº Processo,"Sensível, com maior exposição",Idade "#),
            vec!["Nº Processo", "Sensível, com maior exposição", "Idade"]
        );
    }

    #[test]
    fn test_parse_header_line_escaped_quote() {
        assert_eq!(parse_header_line(r#""a""b",c"#), vec![r#"a"b"#, "c"]);
    }
}
