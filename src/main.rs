use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

use guardmark::config::Config;
use guardmark::pipeline::{place_with_margin, stamp_file, write_preview};
use guardmark::watermark::{density_label, presets, score, Page, WatermarkInstance};

/// Guardmark - deterministic multi-layer watermark placement
#[derive(Parser, Debug)]
#[command(name = "guardmark")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Use a built-in preset as the watermark configuration
    #[arg(short, long, global = true)]
    preset: Option<String>,

    /// Override the watermark text
    #[arg(long, global = true)]
    text: Option<String>,

    /// Override the random seed of the protection layers
    #[arg(long, global = true)]
    seed: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the placement for one page as JSON
    Place {
        /// Page width in points
        #[arg(long, default_value_t = 595.0)]
        width: f64,
        /// Page height in points
        #[arg(long, default_value_t = 842.0)]
        height: f64,
    },
    /// Render a PNG preview of one page
    Preview {
        #[arg(long, default_value_t = 595.0)]
        width: f64,
        #[arg(long, default_value_t = 842.0)]
        height: f64,
        /// Pixels per point (overrides the configuration)
        #[arg(long)]
        scale: Option<f64>,
        /// Output PNG path
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Stamp the pages of a PDF document
    Stamp {
        /// Input PDF path
        input: PathBuf,
        /// Output PDF path
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Print the protection score of the configuration
    Score,
    /// List the built-in presets
    Presets,
}

#[derive(Serialize)]
struct PlacementOutput<'a> {
    pattern: &'static str,
    page: Page,
    /// Free border kept on every side, in points
    margin: f64,
    truncated: bool,
    instances: &'a [WatermarkInstance],
}

fn load_config(args: &Args) -> anyhow::Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => Config::default(),
    };

    if let Some(name) = &args.preset {
        let preset = presets::find(name).ok_or_else(|| anyhow!("Unknown preset '{}'", name))?;
        config.watermark = preset.config();
    }
    if let Some(text) = &args.text {
        config.watermark.text = text.clone();
    }
    if let Some(seed) = &args.seed {
        config.watermark.random_seed = Some(seed.clone());
    }

    config
        .validate()
        .map_err(|e| anyhow!("Invalid configuration: {}", e))?;
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;

    guardmark::logging::init_subscriber(&config.logging)
        .map_err(|e| anyhow!("Failed to initialize logging subsystem: {}", e))?;

    tracing::info!(
        pattern = config.watermark.pattern.as_str(),
        preset = args.preset.as_deref().unwrap_or("none"),
        "Configuration loaded successfully"
    );

    match args.command {
        Command::Place { width, height } => {
            let page = Page::new(width, height)?;
            let placement = place_with_margin(&config.watermark, &page, config.pages.margin)?;
            let output = PlacementOutput {
                pattern: config.watermark.pattern.as_str(),
                page,
                margin: config.pages.margin,
                truncated: placement.truncated,
                instances: &placement.instances,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Command::Preview {
            width,
            height,
            scale,
            output,
        } => {
            let page = Page::new(width, height)?;
            let mut preview = config.preview;
            if let Some(scale) = scale {
                preview.scale = scale;
            }
            let report = write_preview(
                &config.watermark,
                &page,
                config.pages.margin,
                &preview,
                &output,
            )?;
            println!(
                "{}: {} marks drawn, {} skipped",
                output.display(),
                report.drawn.len(),
                report.skipped.len()
            );
        }
        Command::Stamp { input, output } => {
            if input == output {
                bail!("Refusing to overwrite the input document in place");
            }
            let report = stamp_file(&input, &output, &config.watermark, &config.pages)?;
            println!(
                "{}: {} of {} pages stamped, {} marks drawn, {} skipped",
                output.display(),
                report.pages_stamped,
                report.pages_total,
                report.instances_drawn,
                report.instances_skipped
            );
        }
        Command::Score => {
            let s = score(&config.watermark);
            println!("score:   {} ({})", s.value, s.level.as_str());
            println!("layers:  {} of 7", s.enabled_layers);
            println!("density: {}", density_label(s.total_count));
        }
        Command::Presets => {
            for preset in presets::all() {
                let s = score(&preset.config());
                println!(
                    "{:<16} {:<14} score {:>3}  {}",
                    preset.name,
                    preset.pattern().as_str(),
                    s.value,
                    preset.description
                );
            }
        }
    }

    Ok(())
}
