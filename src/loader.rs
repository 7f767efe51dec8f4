use std::{fmt, fs::File, io, path::{Path, PathBuf}};

use csv::{ReaderBuilder, Trim};
use thiserror::Error;
use tracing::debug;

/// A single cell of a loaded table, numeric whenever its text is a number.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Number(f64),
    Text(String),
}

impl Field {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Field::Number(n) => Some(*n),
            Field::Text(_) => None,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Number(n) => write!(f, "{n}"),
            Field::Text(s) => f.write_str(s),
        }
    }
}

/// Coerces a raw cell. `"0"` is always zero; any other text becomes a number
/// only if all of it parses as a finite float.
pub fn parse_field(text: &str) -> Field {
    let text = text.trim();
    if text == "0" {
        return Field::Number(0.0);
    }
    match text.parse::<f64>() {
        Ok(n) if n.is_finite() => Field::Number(n),
        _ => Field::Text(text.to_owned()),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// 1-based line in the source file.
    pub line: u64,
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub header: Option<Vec<String>>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    pub delimiter: u8,
    pub has_header: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions { delimiter: b',', has_header: true }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read `{}`: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("malformed table in `{}`: {source}", path.display())]
    Csv { path: PathBuf, source: csv::Error },
}

pub fn read_table(path: impl AsRef<Path>, options: &LoadOptions) -> Result<Table, LoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LoadError::Io { path: path.to_owned(), source })?;
    let table = read_from(file, options).map_err(|source| LoadError::Csv { path: path.to_owned(), source })?;
    debug!(path = %path.display(), rows = table.len(), "loaded table");
    Ok(table)
}

pub fn read_from<R: io::Read>(reader: R, options: &LoadOptions) -> Result<Table, csv::Error> {
    let mut reader = ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(Trim::All)
        .from_reader(reader);

    let mut table = Table::default();
    let mut header_pending = options.has_header;
    for record in reader.records() {
        let record = record?;
        // whitespace-only lines survive as a single empty field; rows of bare
        // delimiters are kept so record conversion can reject them
        if record.len() == 1 && record[0].is_empty() {
            continue;
        }
        if header_pending {
            table.header = Some(record.iter().map(str::to_owned).collect());
            header_pending = false;
            continue;
        }
        let line = record.position().map_or(0, |p| p.line());
        table.rows.push(Row { line, fields: record.iter().map(parse_field).collect() });
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Field {
        Field::Text(s.to_owned())
    }

    #[test]
    fn coerces_numbers_and_keeps_codes() {
        assert_eq!(parse_field("0"), Field::Number(0.0));
        assert_eq!(parse_field("5556"), Field::Number(5556.0));
        assert_eq!(parse_field(" 12.5 "), Field::Number(12.5));
        assert_eq!(parse_field("JFK"), text("JFK"));
        assert_eq!(parse_field("$1.23"), text("$1.23"));
        assert_eq!(parse_field("12abc"), text("12abc"));
        assert_eq!(parse_field(""), text(""));
        assert_eq!(parse_field("inf"), text("inf"));
    }

    #[test]
    fn splits_header_and_skips_blank_lines() {
        let input = "code,name,a,b\n\nJFK,John F Kennedy,5556,5555\n   \nORY,Paris-Orly,0,367\n";
        let table = read_from(input.as_bytes(), &LoadOptions::default()).unwrap();

        assert_eq!(
            table.header,
            Some(vec!["code".to_owned(), "name".to_owned(), "a".to_owned(), "b".to_owned()])
        );
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.rows[0].fields,
            vec![text("JFK"), text("John F Kennedy"), Field::Number(5556.0), Field::Number(5555.0)]
        );
        assert_eq!(table.rows[1].fields[2], Field::Number(0.0));
    }

    #[test]
    fn keeps_rows_of_bare_delimiters() {
        let table = read_from("h1,h2,h3\n,,\nMAN,JFK,X\n".as_bytes(), &LoadOptions::default()).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0].fields, vec![text(""), text(""), text("")]);
        assert_eq!(table.rows[1].fields, vec![text("MAN"), text("JFK"), text("X")]);
    }

    #[test]
    fn honours_delimiter_and_headerless_input() {
        let options = LoadOptions { delimiter: b';', has_header: false };
        let table = read_from("MAN; JFK ;X\n".as_bytes(), &options).unwrap();

        assert_eq!(table.header, None);
        assert_eq!(table.rows[0].fields, vec![text("MAN"), text("JFK"), text("X")]);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = read_table("definitely/not/here.csv", &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("definitely/not/here.csv"));
    }
}
