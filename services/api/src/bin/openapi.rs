//! services/api/src/bin/openapi.rs
//!
//! Writes the study tracker's OpenAPI document to disk.
//!
//! Usage: `openapi [OUTPUT]` (defaults to `openapi.json`). With `--check`, the
//! existing file is compared instead and the process fails if it is stale.

use api_lib::web::rest::ApiDoc;
use std::path::PathBuf;
use utoipa::OpenApi;

const DEFAULT_OUTPUT: &str = "openapi.json";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut check = false;
    let mut output = PathBuf::from(DEFAULT_OUTPUT);
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--check" => check = true,
            other => output = PathBuf::from(other),
        }
    }

    let document = ApiDoc::openapi();
    let rendered = document.to_pretty_json()?;

    if check {
        let on_disk = std::fs::read_to_string(&output)?;
        if on_disk.trim_end() != rendered.trim_end() {
            return Err(format!("{} is out of date, regenerate it", output.display()).into());
        }
        println!("{} is up to date", output.display());
        return Ok(());
    }

    std::fs::write(&output, rendered)?;
    println!(
        "Wrote {} paths to {}",
        document.paths.paths.len(),
        output.display()
    );
    Ok(())
}
