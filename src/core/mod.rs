pub mod charts;
pub mod config;
pub mod data;
pub mod formatter;
pub mod models;
pub mod theme;
