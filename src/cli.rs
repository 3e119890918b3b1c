use crate::config::load_config;
use crate::export::{write_artifact, ExportFormat};
use crate::graph::Dataset;
use crate::session::{EditorEvent, EditorSession, EventOutcome};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "graphedit",
    version,
    about = "Headless node-link graph editing session with SVG/PNG/JPEG export"
)]
pub struct Args {
    /// Input dataset (.json with nodes/edges) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to graph.svg or image.<format> in the working
    /// directory.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Raster resolution in DPI (the editor offers 200/300/600); ignored for
    /// SVG output
    #[arg(short = 'r', long = "resolution", default_value_t = 300)]
    pub resolution: u32,

    /// Config file (JSON5: theme, physics, export)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Layout ticks to run before exporting
    #[arg(short = 't', long = "settleTicks", default_value_t = 300)]
    pub settle_ticks: u32,

    /// Export the dataset positions as-is without running the layout
    #[arg(long = "noPhysics")]
    pub no_physics: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
    Jpg,
}

impl From<OutputFormat> for ExportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Svg => ExportFormat::Svg,
            OutputFormat::Png => ExportFormat::Png,
            OutputFormat::Jpg => ExportFormat::Jpg,
        }
    }
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    let input = read_input(args.input.as_deref())?;
    let dataset = Dataset::from_json(&input)?;
    if dataset.graph.node_count() == 0 {
        log::warn!("dataset has no nodes; the export will be an empty canvas");
    }

    let mut session = EditorSession::new(dataset, config);
    if args.no_physics {
        session.dispatch(EditorEvent::TogglePhysics)?;
    } else {
        for _ in 0..args.settle_ticks {
            session.dispatch(EditorEvent::Tick)?;
        }
    }

    let format: ExportFormat = args.output_format.into();
    let outcome = session.dispatch(EditorEvent::Export {
        format,
        dpi: Some(args.resolution),
    })?;
    let EventOutcome::Exported(artifact) = outcome else {
        return Err(anyhow::anyhow!("export produced no artifact"));
    };
    write_artifact(&artifact, args.output.as_deref())?;
    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path == Path::new("-") {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            return Ok(buf);
        }
        return Ok(std::fs::read_to_string(path)?);
    }

    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}
