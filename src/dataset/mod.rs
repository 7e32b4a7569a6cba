//! Data model shared by the source and the target
//!
//! Rows are transferred verbatim; the only thing this module knows about
//! is which tables exist and which columns the target expects, in order.

mod row;
mod table;

pub use row::{Row, Value};
pub use table::{Column, Table};
