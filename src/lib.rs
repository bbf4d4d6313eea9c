//! Connections Source Library
//!
//! This library exposes the active client connections of a managed control
//! plane as a typed tabular dataset: a declarative record mapper binds typed
//! columns to extraction logic, and a data source drives fetch, optional
//! enrichment, and row mapping into a single page.

pub mod config;
pub mod error;
pub mod mapping;
pub mod models;
pub mod output;
pub mod source;
pub mod upstream;

pub use config::Config;
pub use error::{SourceError, SourceResult};
pub use mapping::{RecordMapperBuilder, RowBuilder};
pub use source::ConnectionSource;
pub use upstream::{InMemoryUpstream, Upstream};
