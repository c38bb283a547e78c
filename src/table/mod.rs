//! Sortable, filterable, paginated table over flat snapshot records.

pub mod column;
pub mod compare;
pub mod page;
pub mod view;

pub use column::{CellFormat, Column, ColumnPreset, ColumnSet, ColumnType};
pub use compare::{SortDirection, SortKey};
pub use page::{PageWindow, Pagination};
pub use view::{Body, PageModel, TableView, ViewEvent, ViewOptions, ViewState};
