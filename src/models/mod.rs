//! Data models for the connections source.
//!
//! This module re-exports all model types used throughout the application.

pub mod connection;
pub mod message;
pub mod page;
pub mod schema;

// Re-export commonly used types
pub use connection::ConnectionRecord;
pub use message::{DiagnoseKind, InfoType, Request, Response};
pub use page::{CellValue, Page, Row};
pub use schema::{ColumnDefinition, ColumnType, Schema};
