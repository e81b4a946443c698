//! gridstate core - the data model behind a data grid
//!
//! This crate defines the state a grid hands back and forth with its host
//! application, and nothing that depends on how rows are fetched or drawn:
//!
//! - `GridState` - page, sort and filter configuration, replaced through
//!   pure transitions (`GridState::apply`)
//! - `GridAction` - every state change expressed as a value
//! - `FilterClause` / `FilterOperator` / `FilterType` - one field-scoped filter
//! - `SortSpec` / `SortDirection` - the single-column sort
//! - `ColumnDescriptor` / `ColumnSet` - caller-supplied column metadata
//! - `value` - dotted field lookup and the coercions filters and sorts rely on

mod column;
mod error;
mod filter;
mod sort;
mod state;
pub mod value;

pub use column::*;
pub use error::*;
pub use filter::*;
pub use sort::*;
pub use state::*;
