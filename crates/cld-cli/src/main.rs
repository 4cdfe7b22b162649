use clap::{Parser, Subcommand, ValueEnum};
use cld::render::raster::{RasterError, RasterOptions};
use cld::render::{HeadlessError, HeadlessRenderer};
use cld::{Diagram, Theme, dataset};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("I/O error: {0}")]
    Stdout(#[from] std::io::Error),
    #[error(transparent)]
    Model(#[from] cld::Error),
    #[error(transparent)]
    Headless(#[from] HeadlessError),
    #[error(transparent)]
    Raster(#[from] RasterError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Renders the built-in "drifting goals" causal-loop diagram.
#[derive(Parser)]
#[command(name = "cld", version, about, long_about = None)]
struct Opts {
    /// More log output on stderr (-v info, -vv debug). Falls back to RUST_LOG, then warn.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Draw the diagram as SVG, PNG, JPG or PDF.
    Render(RenderArgs),
    /// Print the computed layout as JSON.
    Layout {
        #[arg(long)]
        pretty: bool,
        /// JSON or YAML theme overrides.
        #[arg(long)]
        theme: Option<PathBuf>,
    },
    /// Validate the diagram tables and print their sizes.
    Check,
}

#[derive(clap::Args)]
struct RenderArgs {
    #[arg(long, value_enum, default_value_t = Format::Svg)]
    format: Format,
    /// Output file. SVG goes to stdout when omitted; other formats default to ./out.<ext>.
    #[arg(long)]
    out: Option<PathBuf>,
    #[arg(long, default_value_t = 1.0, value_parser = positive_scale)]
    scale: f32,
    /// CSS color painted behind the diagram.
    #[arg(long)]
    background: Option<String>,
    /// Root `<svg id>`; sanitized to a valid XML id.
    #[arg(long)]
    id: Option<String>,
    /// JSON or YAML theme overrides.
    #[arg(long)]
    theme: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Svg,
    Png,
    #[value(alias = "jpeg")]
    Jpg,
    Pdf,
}

impl Format {
    fn extension(self) -> &'static str {
        match self {
            Format::Svg => "svg",
            Format::Png => "png",
            Format::Jpg => "jpg",
            Format::Pdf => "pdf",
        }
    }
}

fn positive_scale(raw: &str) -> Result<f32, String> {
    let scale: f32 = raw.parse().map_err(|e| format!("{e}"))?;
    if scale.is_finite() && scale > 0.0 {
        Ok(scale)
    } else {
        Err(format!("scale must be a positive number, got {raw}"))
    }
}

fn log_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => std::env::var("RUST_LOG")
            .ok()
            .and_then(|v| LevelFilter::from_str(v.trim()).ok())
            .unwrap_or(LevelFilter::Warn),
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    }
}

fn load_theme(path: Option<&Path>) -> Result<Theme, CliError> {
    let Some(path) = path else {
        return Ok(Theme::default());
    };
    let text = std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let yaml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));
    let theme = if yaml {
        Theme::from_yaml_str(&text)?
    } else {
        Theme::from_json_str(&text)?
    };
    tracing::info!("loaded theme overrides from {}", path.display());
    Ok(theme)
}

fn write_bytes(bytes: &[u8], out: &Path) -> Result<(), CliError> {
    std::fs::write(out, bytes).map_err(|source| CliError::Io {
        path: out.to_path_buf(),
        source,
    })?;
    tracing::info!("wrote {} bytes to {}", bytes.len(), out.display());
    Ok(())
}

fn render(diagram: &Diagram, args: RenderArgs) -> Result<(), CliError> {
    let mut renderer = HeadlessRenderer::new().with_theme(load_theme(args.theme.as_deref())?);
    if let Some(id) = &args.id {
        renderer = renderer.with_diagram_id(id);
    }
    if let Some(bg) = &args.background {
        renderer = renderer.with_background(bg.clone());
    }
    let raster = RasterOptions {
        scale: args.scale,
        background: args.background.clone(),
        ..RasterOptions::default()
    };

    let default_out = || PathBuf::from(format!("out.{}", args.format.extension()));
    match args.format {
        Format::Svg => {
            let svg = renderer.render_svg(diagram)?;
            match &args.out {
                Some(path) => write_bytes(svg.as_bytes(), path)?,
                None => print!("{svg}"),
            }
        }
        Format::Png => {
            let bytes = renderer.render_png(diagram, &raster)?;
            write_bytes(&bytes, &args.out.clone().unwrap_or_else(default_out))?;
        }
        Format::Jpg => {
            let bytes = renderer.render_jpeg(diagram, &raster)?;
            write_bytes(&bytes, &args.out.clone().unwrap_or_else(default_out))?;
        }
        Format::Pdf => {
            let bytes = renderer.render_pdf(diagram)?;
            write_bytes(&bytes, &args.out.clone().unwrap_or_else(default_out))?;
        }
    }
    Ok(())
}

fn run(opts: Opts) -> Result<(), CliError> {
    let diagram = dataset::drifting_goals()?;
    match opts.command {
        Command::Render(args) => render(&diagram, args),
        Command::Layout { pretty, theme } => {
            let renderer = HeadlessRenderer::new().with_theme(load_theme(theme.as_deref())?);
            let layout = renderer.layout(&diagram)?;
            let stdout = std::io::stdout().lock();
            if pretty {
                serde_json::to_writer_pretty(stdout, &layout)?;
            } else {
                serde_json::to_writer(stdout, &layout)?;
            }
            println!();
            Ok(())
        }
        Command::Check => {
            println!(
                "ok: {} nodes, {} edges, {} loops",
                diagram.nodes().len(),
                diagram.edges().len(),
                diagram.loops().len()
            );
            Ok(())
        }
    }
}

fn main() {
    let opts = Opts::parse();
    // Only fails when a logger is already installed.
    let _ = TermLogger::init(
        log_level(opts.verbose),
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );

    if let Err(err) = run(opts) {
        tracing::debug!("{err:?}");
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Opts::command().debug_assert();
    }

    #[test]
    fn verbosity_raises_the_level() {
        assert_eq!(log_level(1), LevelFilter::Info);
        assert_eq!(log_level(2), LevelFilter::Debug);
        assert_eq!(log_level(5), LevelFilter::Debug);
    }

    #[test]
    fn scale_must_be_positive() {
        assert_eq!(positive_scale("2"), Ok(2.0));
        assert!(positive_scale("0").is_err());
        assert!(positive_scale("-1").is_err());
        assert!(positive_scale("nan").is_err());
    }

    #[test]
    fn render_flags_parse() {
        let opts = Opts::try_parse_from([
            "cld", "-vv", "render", "--format", "jpeg", "--scale", "2", "--id", "x",
        ])
        .unwrap();
        assert_eq!(opts.verbose, 2);
        let Command::Render(args) = opts.command else {
            panic!("expected render");
        };
        assert_eq!(args.format, Format::Jpg);
        assert_eq!(args.scale, 2.0);
    }
}
