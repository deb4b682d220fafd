//! Loading point series from JSON files.

use std::io::Read;
use std::path::Path;

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::core::models::points::{CostTrendPoint, TokenUsagePoint};

#[derive(Error, Debug)]
pub enum DataError {
    #[error("Failed to read series: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse series: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Read a file, or stdin when `path` is "-".
pub fn read_source(path: &Path) -> Result<String, DataError> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    Ok(std::fs::read_to_string(path)?)
}

pub fn parse_cost_series(json: &str) -> Result<Vec<CostTrendPoint>, DataError> {
    parse_series(json)
}

pub fn parse_token_series(json: &str) -> Result<Vec<TokenUsagePoint>, DataError> {
    parse_series(json)
}

pub fn load_cost_series(path: &Path) -> Result<Vec<CostTrendPoint>, DataError> {
    parse_cost_series(&read_source(path)?)
}

pub fn load_token_series(path: &Path) -> Result<Vec<TokenUsagePoint>, DataError> {
    parse_token_series(&read_source(path)?)
}

fn parse_series<T: DeserializeOwned>(json: &str) -> Result<Vec<T>, DataError> {
    let points: Vec<T> = serde_json::from_str(json)?;
    tracing::debug!(points = points.len(), "parsed series");
    Ok(points)
}
