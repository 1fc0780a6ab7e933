//! Expression table loaded from GCT-style tab-separated files.

use crate::data::Value;
use crate::error::{MarkerError, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Number of non-data lines before the header row (`#1.3` version line and dimensions line).
pub const PREAMBLE_LINES: usize = 2;

/// What a column holds, ignoring missing cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Only numbers.
    Numeric,
    /// Only text.
    Text,
    /// Numbers and text; `row` is the first text cell.
    Mixed { row: usize },
    /// Nothing but missing cells.
    Empty,
}

/// A labelled table of cells.
///
/// Every header field of a loaded file is a column and rows get a
/// positional index (`"0"`, `"1"`, ...). [`Table::set_index`] promotes a
/// column to the row identifiers. Depending on orientation rows are
/// samples (with an `age` column and one column per protein) or features
/// (one column per sample).
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Header of the index column, `None` for a positional index.
    index_name: Option<String>,
    /// Row identifiers.
    index: Vec<String>,
    /// Column names, excluding the index column.
    columns: Vec<String>,
    /// Row-major cells, each row has `columns.len()` entries.
    cells: Vec<Vec<Value>>,
}

fn check_shape(n_rows: usize, n_cols: usize, cells: &[Vec<Value>]) -> Result<()> {
    if cells.len() != n_rows {
        return Err(MarkerError::DimensionMismatch {
            expected: n_rows,
            actual: cells.len(),
        });
    }
    if let Some(bad) = cells.iter().find(|row| row.len() != n_cols) {
        return Err(MarkerError::DimensionMismatch {
            expected: n_cols,
            actual: bad.len(),
        });
    }
    Ok(())
}

impl Table {
    /// Create a table with a named index, checking that every row matches the column count.
    pub fn new(
        index_name: impl Into<String>,
        index: Vec<String>,
        columns: Vec<String>,
        cells: Vec<Vec<Value>>,
    ) -> Result<Self> {
        check_shape(index.len(), columns.len(), &cells)?;
        Ok(Self {
            index_name: Some(index_name.into()),
            index,
            columns,
            cells,
        })
    }

    /// Create a table whose rows are numbered from zero.
    pub fn with_positional_index(columns: Vec<String>, cells: Vec<Vec<Value>>) -> Result<Self> {
        let index = (0..cells.len()).map(|i| i.to_string()).collect();
        check_shape(cells.len(), columns.len(), &cells)?;
        Ok(Self {
            index_name: None,
            index,
            columns,
            cells,
        })
    }

    /// Load a table from a GCT-style file.
    ///
    /// Expected format:
    /// - Lines 1-2: preamble, skipped
    /// - Line 3: header; every field is a column name
    /// - Subsequent lines: one cell per column
    ///
    /// Column names are trimmed of surrounding whitespace.
    pub fn from_gct<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let table = Self::from_reader(BufReader::new(file))?;
        log::debug!(
            "Loaded {:?}: {} rows x {} columns",
            path,
            table.n_rows(),
            table.n_cols()
        );
        Ok(table)
    }

    /// Load a table from any buffered reader holding GCT-style text.
    pub fn from_reader<R: BufRead>(mut reader: R) -> Result<Self> {
        let mut skipped = String::new();
        for line_no in 1..=PREAMBLE_LINES {
            skipped.clear();
            if reader.read_line(&mut skipped)? == 0 {
                return Err(MarkerError::Parse(format!(
                    "File ended at preamble line {}, expected {} preamble lines and a header",
                    line_no, PREAMBLE_LINES
                )));
            }
        }

        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .quoting(false)
            .from_reader(reader);

        let columns: Vec<String> = rdr.headers()?.iter().map(|s| s.trim().to_string()).collect();
        if columns.iter().all(String::is_empty) {
            return Err(MarkerError::Parse("Header row names no columns".to_string()));
        }

        let mut cells = Vec::new();
        for record in rdr.records() {
            let record = record?;
            cells.push(record.iter().map(Value::parse).collect());
        }

        if cells.is_empty() {
            return Err(MarkerError::EmptyData("No data rows after header".to_string()));
        }

        Self::with_positional_index(columns, cells)
    }

    /// Write the table in the same GCT-style layout it is read from.
    pub fn to_tsv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        writeln!(writer, "#1.3")?;
        let n_fields = self.n_cols() + usize::from(self.index_name.is_some());
        writeln!(writer, "{}\t{}", self.n_rows(), n_fields)?;

        let mut header: Vec<&str> = self.index_name.iter().map(String::as_str).collect();
        header.extend(self.columns.iter().map(String::as_str));
        writeln!(writer, "{}", header.join("\t"))?;

        for (id, row) in self.index.iter().zip(&self.cells) {
            let mut fields: Vec<String> = Vec::with_capacity(row.len() + 1);
            if self.index_name.is_some() {
                fields.push(id.clone());
            }
            fields.extend(row.iter().map(Value::to_string));
            writeln!(writer, "{}", fields.join("\t"))?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Header of the index column, `None` for a positional index.
    pub fn index_name(&self) -> Option<&str> {
        self.index_name.as_deref()
    }

    /// Row identifiers.
    #[inline]
    pub fn index(&self) -> &[String] {
        &self.index
    }

    /// Column names.
    #[inline]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of rows.
    #[inline]
    pub fn n_rows(&self) -> usize {
        self.index.len()
    }

    /// Number of columns (excluding the index).
    #[inline]
    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// Position of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Position of the first row with this identifier.
    pub fn row_position(&self, id: &str) -> Option<usize> {
        self.index.iter().position(|r| r == id)
    }

    /// Map from row identifier to position. Duplicate ids keep their first row.
    pub fn index_map(&self) -> HashMap<&str, usize> {
        let mut map = HashMap::with_capacity(self.index.len());
        for (i, id) in self.index.iter().enumerate() {
            map.entry(id.as_str()).or_insert(i);
        }
        map
    }

    /// For each of our rows, the position of the row with the same id in `other`.
    pub fn align_rows(&self, other: &Table) -> Result<Vec<usize>> {
        let other_index = other.index_map();
        self.index
            .iter()
            .map(|id| {
                other_index
                    .get(id.as_str())
                    .copied()
                    .ok_or_else(|| MarkerError::MissingFeature(id.clone()))
            })
            .collect()
    }

    /// Cell at (row, col).
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> &Value {
        &self.cells[row][col]
    }

    /// Cells of a row.
    #[inline]
    pub fn row(&self, row: usize) -> &[Value] {
        &self.cells[row]
    }

    /// Cells of the row with this identifier.
    pub fn row_by_id(&self, id: &str) -> Option<&[Value]> {
        self.row_position(id).map(|i| self.row(i))
    }

    /// Cells of a named column, in row order.
    pub fn column_values(&self, name: &str) -> Result<Vec<&Value>> {
        let col = self
            .column_index(name)
            .ok_or_else(|| MarkerError::MissingColumn(name.to_string()))?;
        Ok(self.cells.iter().map(|row| &row[col]).collect())
    }

    /// Non-missing numeric values of a row.
    ///
    /// Text cells are rejected: a measurement row must hold numbers only.
    pub fn numeric_row(&self, row: usize) -> Result<Vec<f64>> {
        let mut values = Vec::with_capacity(self.n_cols());
        for (col, value) in self.cells[row].iter().enumerate() {
            match value {
                Value::Number(v) if !v.is_nan() => values.push(*v),
                Value::Number(_) | Value::Missing => {}
                Value::Text(s) => {
                    return Err(MarkerError::InvalidValue {
                        feature: self.index[row].clone(),
                        column: self.columns[col].clone(),
                        value: s.clone(),
                    })
                }
            }
        }
        Ok(values)
    }

    /// Classify the non-missing cells of a column.
    pub fn column_kind(&self, col: usize) -> ColumnKind {
        let mut any_number = false;
        let mut first_text = None;
        for (row, cells) in self.cells.iter().enumerate() {
            match &cells[col] {
                Value::Number(_) => any_number = true,
                Value::Text(_) => {
                    first_text.get_or_insert(row);
                }
                Value::Missing => {}
            }
        }
        match (any_number, first_text) {
            (true, None) => ColumnKind::Numeric,
            (true, Some(row)) => ColumnKind::Mixed { row },
            (false, Some(_)) => ColumnKind::Text,
            (false, None) => ColumnKind::Empty,
        }
    }

    /// Columns whose non-missing cells are all numbers (and at least one is present).
    pub fn numeric_columns(&self) -> Vec<usize> {
        (0..self.n_cols())
            .filter(|&col| self.column_kind(col) == ColumnKind::Numeric)
            .collect()
    }

    /// Replace the cell at (row, col).
    pub fn set(&mut self, row: usize, col: usize, value: Value) {
        self.cells[row][col] = value;
    }

    /// Use a column as the row identifiers, removing it from the columns.
    ///
    /// Cells are converted with their display form; missing cells give empty ids.
    pub fn set_index(&self, name: &str) -> Result<Self> {
        let col = self
            .column_index(name)
            .ok_or_else(|| MarkerError::MissingColumn(name.to_string()))?;
        let index = self.cells.iter().map(|row| row[col].to_string()).collect();
        let keep: Vec<usize> = (0..self.n_cols()).filter(|&c| c != col).collect();
        let columns = keep.iter().map(|&c| self.columns[c].clone()).collect();
        let cells = self
            .cells
            .iter()
            .map(|row| keep.iter().map(|&c| row[c].clone()).collect())
            .collect();
        Self::new(name, index, columns, cells)
    }

    /// Subset to the given rows (by position), in the given order.
    pub fn select_rows(&self, rows: &[usize]) -> Result<Self> {
        let mut index = Vec::with_capacity(rows.len());
        let mut cells = Vec::with_capacity(rows.len());
        for &row in rows {
            if row >= self.n_rows() {
                return Err(MarkerError::InvalidParameter(format!(
                    "Row index {} out of bounds",
                    row
                )));
            }
            index.push(self.index[row].clone());
            cells.push(self.cells[row].clone());
        }
        Ok(Self {
            index_name: self.index_name.clone(),
            index,
            columns: self.columns.clone(),
            cells,
        })
    }

    /// Subset to the given columns (by position), in the given order.
    pub fn select_columns(&self, cols: &[usize]) -> Result<Self> {
        if let Some(&bad) = cols.iter().find(|&&c| c >= self.n_cols()) {
            return Err(MarkerError::InvalidParameter(format!(
                "Column index {} out of bounds",
                bad
            )));
        }
        let columns = cols.iter().map(|&c| self.columns[c].clone()).collect();
        let cells = self
            .cells
            .iter()
            .map(|row| cols.iter().map(|&c| row[c].clone()).collect())
            .collect();
        Ok(Self {
            index_name: self.index_name.clone(),
            index: self.index.clone(),
            columns,
            cells,
        })
    }

    /// Swap rows and columns. Column names become the index.
    pub fn transpose(&self, index_name: &str) -> Self {
        let cells = (0..self.n_cols())
            .map(|col| self.cells.iter().map(|row| row[col].clone()).collect())
            .collect();
        Self {
            index_name: Some(index_name.to_string()),
            index: self.columns.clone(),
            columns: self.index.clone(),
            cells,
        }
    }
}

/// Load an expression table from a GCT-style file.
pub fn read_table<P: AsRef<Path>>(path: P) -> Result<Table> {
    Table::from_gct(path)
}
