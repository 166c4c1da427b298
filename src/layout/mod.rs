//! Grid layout: which columns exist, in which order, and how wide they are.

mod column_layout;

pub use column_layout::{ColumnLayout, GridColumn};
