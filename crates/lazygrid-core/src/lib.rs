//! LazyGrid Core - shared types and the record source contract
//!
//! This crate provides the fundamental types that the other LazyGrid crates
//! depend on:
//!
//! - `Record`, `Field`, `CellValue`, `ColumnMeta` - the grid data model
//! - `RecordSource` - trait for the remote collection behind a grid
//! - `FetchPlan` - page, sort and filter parameters sent to a source
//! - `MemorySource` - in-process source used by tests and the CLI
//! - `NotificationSink` - fire-and-forget toast notifications

mod error;
mod memory_source;
mod notification;
mod source;
mod types;

pub use error::*;
pub use memory_source::*;
pub use notification::*;
pub use source::*;
pub use types::*;
