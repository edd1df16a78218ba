//! CLI logic for the ocelgraph tool.
//!
//! Reads an object graph summary, lays it out and writes the render
//! descriptors (JSON) or a picture (SVG) to a file or standard output.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, OutputFormat};

use std::{
    fs,
    io::{self, Write},
    path::Path,
};

use log::info;

use ocelgraph::{
    ObjectGraphBuilder, OcelGraphError,
    export::{Exporter, json::Json, svg::Svg},
};

/// Run the ocelgraph CLI application
///
/// This function processes the input file through the ocelgraph pipeline
/// and writes the rendered output.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `OcelGraphError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Parsing errors
/// - Rejected input
/// - Layout errors
/// - Rendering errors
pub fn run(args: &Args) -> Result<(), OcelGraphError> {
    info!(
        input_path = args.input,
        output_path:? = args.output,
        format:? = args.format;
        "Processing object graph summary"
    );

    let app_config = config::load_config(args.config.as_ref())?;
    let app_config = config::apply_overrides(app_config, args.engine, args.rank_direction);

    let source = fs::read_to_string(&args.input)?;

    let builder = ObjectGraphBuilder::new(app_config);
    let summary = builder.parse(&source)?;
    let model = builder.render(&summary)?;

    let exporter: Box<dyn Exporter> = match args.format {
        OutputFormat::Json => Box::new(Json::new().with_pretty(true)),
        OutputFormat::Svg => Box::new(Svg::new()),
    };

    match &args.output {
        Some(path) => {
            exporter.write(&model, Path::new(path))?;
            info!(output_file = path.as_str(); "Output exported successfully");
        }
        None => {
            let rendered = exporter.render(&model)?;
            let mut stdout = io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }

    Ok(())
}
