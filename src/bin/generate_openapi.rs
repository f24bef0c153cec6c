//! Writes the OpenAPI document of the telemetry API.
//!
//! Usage:
//!   cargo run --bin generate_openapi > openapi.json
//!   cargo run --bin generate_openapi -- --output openapi.json

use std::{
    env, fs,
    io::{self, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use dht22_telemetry::api::handlers::ApiDoc;
use utoipa::OpenApi;

fn main() -> Result<()> {
    let json = ApiDoc::openapi()
        .to_pretty_json()
        .context("failed to serialise OpenAPI document")?;

    match output_path(env::args()) {
        Some(path) => {
            fs::write(&path, &json)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("OpenAPI document written to {}", path.display());
        }
        None => io::stdout()
            .write_all(json.as_bytes())
            .context("failed to write to stdout")?,
    }

    Ok(())
}

/// Value following `--output`, if any.
fn output_path(args: impl Iterator<Item = String>) -> Option<PathBuf> {
    let args: Vec<String> = args.collect();
    args.windows(2)
        .find(|w| w[0] == "--output")
        .map(|w| PathBuf::from(&w[1]))
}
