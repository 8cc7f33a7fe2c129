use super::format::ColumnFormat;
use nalgebra::DMatrix;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("File I/O error for '{path}': {source}", path = path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("I/O error: {0}")]
    Stream(#[from] io::Error),
    #[error("Invalid number on line {line}: '{value}'")]
    InvalidNumber { line: usize, value: String },
    #[error("Line {line} has {found} columns, expected {expected}")]
    RaggedRow {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("Column {index} requested from a table with {available} columns")]
    ColumnOutOfRange { index: usize, available: usize },
    #[error("Columns have mismatched lengths ({expected} vs {found})")]
    ColumnLengthMismatch { expected: usize, found: usize },
    #[error("Invalid value for metadata key '{key}': '{value}'")]
    InvalidMetadata { key: String, value: String },
    #[error("CSV writer error: {0}")]
    Csv(#[from] csv::Error),
}

/// A rectangular table of numbers read from a whitespace-delimited text file.
///
/// Lines starting with `#` are comments. Comments shaped like `# key: value`
/// are kept as metadata, which is how the simulator records run information
/// such as the iteration count of a movie frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    data: Vec<Vec<f64>>,
    cols: usize,
    metadata: BTreeMap<String, String>,
}

impl Table {
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, TableError> {
        let cols = rows.first().map_or(0, Vec::len);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(TableError::RaggedRow {
                    line: i + 1,
                    expected: cols,
                    found: row.len(),
                });
            }
        }
        Ok(Self {
            data: rows,
            cols,
            metadata: BTreeMap::new(),
        })
    }

    pub fn parse(reader: impl BufRead) -> Result<Self, TableError> {
        let mut table = Table::default();

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;
            let trimmed = line.trim();

            if trimmed.is_empty() {
                continue;
            }
            if let Some(comment) = trimmed.strip_prefix('#') {
                if let Some((key, value)) = comment.split_once(':') {
                    let key = key.trim();
                    if !key.is_empty() && !key.contains(char::is_whitespace) {
                        table
                            .metadata
                            .insert(key.to_string(), value.trim().to_string());
                    }
                }
                continue;
            }

            let row = trimmed
                .split_whitespace()
                .map(|field| {
                    field.parse::<f64>().map_err(|_| TableError::InvalidNumber {
                        line: line_num,
                        value: field.to_string(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            if table.data.is_empty() {
                table.cols = row.len();
            } else if row.len() != table.cols {
                return Err(TableError::RaggedRow {
                    line: line_num,
                    expected: table.cols,
                    found: row.len(),
                });
            }
            table.data.push(row);
        }

        Ok(table)
    }

    pub fn load(path: &Path) -> Result<Self, TableError> {
        let file = File::open(path).map_err(|e| TableError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(BufReader::new(file))
    }

    pub fn rows(&self) -> usize {
        self.data.len()
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn row(&self, i: usize) -> Option<&[f64]> {
        self.data.get(i).map(Vec::as_slice)
    }

    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.data.get(i).and_then(|row| row.get(j)).copied()
    }

    pub fn column(&self, j: usize) -> Result<Vec<f64>, TableError> {
        if j >= self.cols {
            return Err(TableError::ColumnOutOfRange {
                index: j,
                available: self.cols,
            });
        }
        Ok(self.data.iter().map(|row| row[j]).collect())
    }

    pub fn metadata(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    pub fn metadata_as<T: FromStr>(&self, key: &str) -> Result<Option<T>, TableError> {
        self.metadata(key)
            .map(|value| {
                value.parse::<T>().map_err(|_| TableError::InvalidMetadata {
                    key: key.to_string(),
                    value: value.to_string(),
                })
            })
            .transpose()
    }

    /// Reverses the row order (numpy's `flipud`).
    pub fn flip_rows(mut self) -> Self {
        self.data.reverse();
        self
    }

    /// Keeps only the first `n` columns.
    pub fn truncate_columns(mut self, n: usize) -> Result<Self, TableError> {
        if n > self.cols {
            return Err(TableError::ColumnOutOfRange {
                index: n - 1,
                available: self.cols,
            });
        }
        for row in &mut self.data {
            row.truncate(n);
        }
        self.cols = n;
        Ok(self)
    }

    pub fn map_column(&mut self, j: usize, f: impl Fn(f64) -> f64) -> Result<(), TableError> {
        if j >= self.cols {
            return Err(TableError::ColumnOutOfRange {
                index: j,
                available: self.cols,
            });
        }
        for row in &mut self.data {
            row[j] = f(row[j]);
        }
        Ok(())
    }

    pub fn to_matrix(&self) -> DMatrix<f64> {
        DMatrix::from_fn(self.rows(), self.cols, |i, j| self.data[i][j])
    }
}

/// Writes column-oriented numeric data the way numpy's `savetxt` does:
/// an optional `# `-prefixed header line followed by delimited rows.
#[derive(Debug, Clone)]
pub struct TableWriter {
    header: Option<String>,
    delimiter: u8,
    formats: Vec<ColumnFormat>,
}

impl Default for TableWriter {
    fn default() -> Self {
        Self {
            header: None,
            delimiter: b'\t',
            formats: Vec::new(),
        }
    }
}

impl TableWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Per-column formats; columns beyond the list use [`ColumnFormat::default`].
    pub fn formats(mut self, formats: &[ColumnFormat]) -> Self {
        self.formats = formats.to_vec();
        self
    }

    pub fn write_to(&self, columns: &[&[f64]], writer: &mut impl Write) -> Result<(), TableError> {
        let rows = columns.first().map_or(0, |c| c.len());
        if let Some(bad) = columns.iter().find(|c| c.len() != rows) {
            return Err(TableError::ColumnLengthMismatch {
                expected: rows,
                found: bad.len(),
            });
        }

        if let Some(header) = &self.header {
            writeln!(writer, "# {}", header)?;
        }

        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .quote_style(csv::QuoteStyle::Never)
            .has_headers(false)
            .from_writer(writer);

        for i in 0..rows {
            let record = columns.iter().enumerate().map(|(j, column)| {
                self.formats
                    .get(j)
                    .copied()
                    .unwrap_or_default()
                    .format(column[i])
            });
            csv_writer.write_record(record)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    pub fn write_to_path(&self, columns: &[&[f64]], path: &Path) -> Result<(), TableError> {
        let mut file = File::create(path).map_err(|e| TableError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        self.write_to(columns, &mut file)
    }
}
