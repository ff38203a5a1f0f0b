//! SheetBridge Core
//!
//! Shared error handling, tabular value types, and the port traits that
//! connect the helpers to a spreadsheet service, a SQL database, a
//! key-value cache, and a property store. This crate has minimal
//! dependencies and defines the vocabulary used by every other crate.

pub mod directive;
pub mod error;
pub mod grid;
pub mod ports;
pub mod sheet;
pub mod text;

pub use directive::WriteDirective;
pub use error::{Error, Result};
pub use grid::{Cell, Grid, Row};
pub use sheet::{Sheet, SheetFormat, Workbook};
