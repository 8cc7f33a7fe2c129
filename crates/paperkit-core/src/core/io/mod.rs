//! Plain-text numeric tables: the format every simulator output file and every
//! derived result in this workspace uses.
//!
//! - [`table`] - Reading whitespace-delimited tables with `# key: value` metadata
//!   and writing delimited tables with per-column formats
//! - [`format`] - printf-compatible (`%d`, `%g`, `%e`) number formatting

pub mod format;
pub mod table;

pub use format::{ColumnFormat, format_general, g};
pub use table::{Table, TableError, TableWriter};
