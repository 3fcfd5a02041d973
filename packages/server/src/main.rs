#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! `SeniAURA` API server binary.
//!
//! Loads the dataset from the configuration named by `SENIAURA_CONFIG`
//! (or the compiled-in default) and serves it on `BIND_ADDR:PORT`.

use std::sync::Arc;

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let config = seniaura_territory::config::load_config(None)?;
    log::info!("Loading dataset...");
    let dataset = seniaura_territory::load(&config)?;

    let (bind_addr, port) = seniaura_server::bind_from_env();
    seniaura_server::run_server(Arc::new(dataset), bind_addr, port).await?;

    Ok(())
}
