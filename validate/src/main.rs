//! Offline checker for HudSprite configuration.
//!
//! Parses directive lines, metadata blocks and markup the way the overlay
//! does and prints the result, so a layout can be checked without starting
//! the game. With the `visual` feature, `preview` renders a surface to PNG.

#[cfg(feature = "visual")]
mod preview;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use hudsprite_core::config::{find_surface_line, parse_config_line};
use hudsprite_core::{colors, markup, settings, ParseDefaults, Rgba, Settings};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about = "Validate hudlcd directives, markup and settings")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Log at debug level (RUST_LOG still wins)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse one directive line
    Config {
        line: String,
        /// Host font size used when the scale field is omitted
        #[arg(long, default_value_t = 1.0)]
        font_size: f32,
        /// Host font color used when the color field is omitted
        #[arg(long, default_value = "white")]
        font_color: String,
    },
    /// Show which metadata lines configure which surfaces
    Metadata {
        #[arg(short, long)]
        path: PathBuf,
        /// Number of surfaces on the block
        #[arg(short, long, default_value_t = 1)]
        surfaces: usize,
        #[arg(long)]
        scan_all_text: bool,
    },
    /// Split a line of surface text into colored segments
    Markup {
        line: String,
        #[arg(long, default_value = "white")]
        base: String,
    },
    /// List named colors
    Colors {
        /// Only names containing this text
        filter: Option<String>,
    },
    /// Show or change the settings file
    Settings {
        #[arg(short, long)]
        path: Option<PathBuf>,
        #[arg(long)]
        enabled: Option<bool>,
        #[arg(long)]
        scan_all_text: Option<bool>,
    },
    /// Render one surface to a PNG
    #[cfg(feature = "visual")]
    Preview(preview::PreviewArgs),
}

fn main() -> Result<(), String> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Config {
            line,
            font_size,
            font_color,
        } => {
            let defaults = ParseDefaults {
                font_size,
                font_color: parse_color_arg(&font_color)?,
            };
            print_config(&line.to_lowercase(), defaults);
            Ok(())
        }
        Commands::Metadata {
            path,
            surfaces,
            scan_all_text,
        } => show_metadata(&path, surfaces, scan_all_text),
        Commands::Markup { line, base } => {
            let base = parse_color_arg(&base)?;
            for (text, color) in markup::segments(&line, base) {
                println!("{:>18}  {text:?}", color.to_string());
            }
            Ok(())
        }
        Commands::Colors { filter } => {
            let mut names: Vec<_> = colors::names()
                .filter(|n| filter.as_deref().is_none_or(|f| n.contains(&f.to_lowercase())))
                .collect();
            names.sort_unstable();
            for name in names {
                if let Some(color) = colors::lookup(name, false) {
                    println!("{name:<22} {color}");
                }
            }
            Ok(())
        }
        Commands::Settings {
            path,
            enabled,
            scan_all_text,
        } => edit_settings(path, enabled, scan_all_text),
        #[cfg(feature = "visual")]
        Commands::Preview(args) => preview::run(args),
    }
}

fn parse_color_arg(arg: &str) -> Result<Rgba, String> {
    colors::parse_color(arg).ok_or_else(|| format!("unknown color: {arg}"))
}

fn print_config(line: &str, defaults: ParseDefaults) {
    let config = parse_config_line(line, defaults);
    println!("top left  {:.4}, {:.4}", config.top_left.x, config.top_left.y);
    println!("scale     {:.4}", config.scale);
    println!("color     {}", config.text_color);
    println!("shadow    {}", config.shadow);
}

fn show_metadata(path: &Path, surfaces: usize, scan_all_text: bool) -> Result<(), String> {
    let metadata = std::fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()))?;

    let mut found = 0;
    for index in 0..surfaces.max(1) {
        match find_surface_line(&metadata, index, scan_all_text) {
            Some(line) => {
                found += 1;
                println!("surface {index}: {}", line.trim());
                print_config(&line, ParseDefaults::default());
            }
            None => println!("surface {index}: not configured"),
        }
    }
    tracing::info!(found, surfaces, "Metadata checked");
    Ok(())
}

fn edit_settings(
    path: Option<PathBuf>,
    enabled: Option<bool>,
    scan_all_text: Option<bool>,
) -> Result<(), String> {
    let path = path
        .or_else(settings::default_settings_path)
        .ok_or("no settings path given and no user data directory found")?;

    let mut current: Settings = settings::load_or_create(&path);
    if enabled.is_some() || scan_all_text.is_some() {
        current.enabled = enabled.unwrap_or(current.enabled);
        current.scan_all_text = scan_all_text.unwrap_or(current.scan_all_text);
        settings::save(&path, &current).map_err(|e| e.to_string())?;
    }

    println!("{}", path.display());
    let json = serde_json::to_string_pretty(&current).map_err(|e| e.to_string())?;
    println!("{json}");
    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    // stdout carries command output, logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
