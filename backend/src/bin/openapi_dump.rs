//! Write the OpenAPI document to stdout or a file.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::fs;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use color_eyre::eyre::{Context, Result};
use food_api::ApiDoc;
use utoipa::OpenApi;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum Format {
    #[default]
    Json,
    Yaml,
}

/// `openapi-dump` command arguments.
#[derive(Debug, Parser)]
#[command(
    name = "openapi-dump",
    about = "Print the Food API OpenAPI document",
    version
)]
struct CliArgs {
    /// Output encoding.
    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,
    /// Write to this file instead of stdout.
    #[arg(long, value_name = "path")]
    output: Option<PathBuf>,
}

fn render(format: Format) -> Result<String> {
    let doc = ApiDoc::openapi();
    match format {
        Format::Json => doc.to_pretty_json().wrap_err("serialise OpenAPI as JSON"),
        Format::Yaml => doc.to_yaml().wrap_err("serialise OpenAPI as YAML"),
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = CliArgs::parse();
    let rendered = render(args.format)?;
    match args.output {
        Some(path) => fs::write(&path, rendered)
            .wrap_err_with(|| format!("write {}", path.display()))?,
        None => println!("{rendered}"),
    }
    Ok(())
}
