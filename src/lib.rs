pub mod aggregate;
pub mod data;
pub mod feed;
pub mod format;
pub mod logging;
pub mod render;
pub mod state;
pub mod table;
