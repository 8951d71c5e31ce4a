//! Terminal UI components.
//!
//! - `render`: sidebar and page pane
//! - `status`: status and toast bars
//! - `overlays`: help and delete confirmation popups

mod overlays;
mod render;
mod status;

pub use render::{
    body_input_rows, field_input_cols, render, sidebar_first_row, split_main_columns,
    split_page_fields,
};

pub const SIDEBAR_WIDTH_PERCENT: u16 = 30;
pub const PAGE_WIDTH_PERCENT: u16 = 70;
