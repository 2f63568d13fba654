//! services/gateway/src/bin/openapi.rs
//!
//! Writes the gateway's OpenAPI document. The output path is the first
//! argument, `openapi.json` by default.

use gateway_lib::web::ApiDoc;
use std::path::PathBuf;
use utoipa::OpenApi;

const DEFAULT_OUTPUT: &str = "openapi.json";

fn write_document(target: Option<String>) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let target = PathBuf::from(target.unwrap_or_else(|| DEFAULT_OUTPUT.to_string()));
    std::fs::write(&target, ApiDoc::openapi().to_pretty_json()?)?;
    Ok(target)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let written = write_document(std::env::args().nth(1))?;
    println!("gateway OpenAPI document written to {}", written.display());
    Ok(())
}
