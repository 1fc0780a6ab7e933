//! Data structures for noise marker analysis.

mod result;
mod table;
mod value;

pub use result::{NoiseDirection, NoiseMarkerResult, NoiseMarkerResultSet, ResultSummary};
pub use table::{read_table, ColumnKind, Table, PREAMBLE_LINES};
pub use value::Value;
