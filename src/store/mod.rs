//! Durable storage for conversion history and favorites.
//!
//! Backed by a fjall keyspace under the user's data directory. Each store
//! keeps its whole collection serialized as one JSON value under a single
//! key, so every mutation is atomic at the granularity of that key.

pub mod favorites;
pub mod history;

use anyhow::{Context, Result};
use fjall::Keyspace;
use std::path::Path;

use crate::config::AppConfig;

pub fn open_default() -> Result<Keyspace> {
    let path = AppConfig::default_data_path()?.join("store");
    open_at(&path)
}

pub fn open_at<P: AsRef<Path>>(path: P) -> Result<Keyspace> {
    fjall::Config::new(path.as_ref())
        .open()
        .with_context(|| format!("Failed to open store at {}", path.as_ref().display()))
}
