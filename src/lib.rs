//! Cost trend and token usage chart cards.
//!
//! [`core::charts`] turns point series into [`core::models::view::Card`]
//! descriptions; [`cli::renderer`] draws those in a terminal.

pub mod cli;
pub mod core;
