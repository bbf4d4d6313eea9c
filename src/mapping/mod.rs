//! Declarative record-to-row mapping.
//!
//! This module binds named, typed columns to extraction logic over an opaque
//! domain record:
//! - `binding`: typed column bindings and the [`CellType`] trait
//! - `mapper`: the [`RecordMapperBuilder`] and the [`RowBuilder`] it produces
//!
//! Column types are derived from the Rust type an extractor returns, so a row
//! built by a [`RowBuilder`] always matches the [`Schema`](crate::models::Schema)
//! built alongside it.

pub mod binding;
pub mod mapper;

pub use binding::{Binding, CellType, ExtractResult};
pub use mapper::{RecordMapperBuilder, RowBuilder};
