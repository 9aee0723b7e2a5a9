//! # Collage CLI
//!
//! Command-line interface for combining images.
//!
//! ## Usage
//!
//! ```bash
//! # List layouts
//! collage layouts
//!
//! # Two photos side by side with captions
//! collage combine --layout horizontal -l Before -l After a.jpg b.jpg -o out.png
//!
//! # Grid of remote images with a title, printed as a data URI
//! collage combine --title "Mood board" --data-uri https://example.com/1.png https://example.com/2.png
//!
//! # Serve the HTTP API
//! collage serve --listen 0.0.0.0:8080 --font-dir ./fonts
//! ```

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::Level;

use collage::{
    CollageError, Color, CombineItem, CombineOptions, Compositor, EngineConfig, LabelStyle,
    Layout, OutputFormat,
    server::{self, ServerConfig},
    text::FontBook,
};

/// Collage - combine images into grids, rows and columns
#[derive(Parser, Debug)]
#[command(name = "collage")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log more (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Combine images into one
    Combine {
        /// Image URLs, data URIs or file paths
        #[arg(required = true)]
        images: Vec<String>,

        /// grid, horizontal or vertical
        #[arg(long, default_value = "grid")]
        layout: Layout,

        /// Spacing between images, in source pixels
        #[arg(long, default_value_t = 20.0)]
        gap: f32,

        /// Title drawn above the collage
        #[arg(long)]
        title: Option<String>,

        /// Caption for the image in the same position (repeatable)
        #[arg(short = 'l', long = "label", value_name = "TEXT")]
        labels: Vec<String>,

        #[arg(long, default_value = "#ffffff")]
        background: Color,

        #[arg(long, default_value = "#000000")]
        label_color: Color,

        #[arg(long, default_value = "#ffffff")]
        label_background: Color,

        /// Title size in output pixels; labels are drawn at 80% of it
        #[arg(long, default_value_t = 40.0)]
        font_size: f32,

        /// Comma-separated family list, resolved against --font-dir
        #[arg(long, default_value = "sans-serif")]
        font_family: String,

        /// Directory of .ttf/.otf files to register
        #[arg(long, value_name = "DIR")]
        font_dir: Option<PathBuf>,

        #[arg(long, default_value_t = EngineConfig::STUDIO.canonical_width)]
        canonical_width: u32,

        /// png or jpeg (defaults to the output extension, else png)
        #[arg(long)]
        format: Option<OutputFormat>,

        /// Output file (defaults to collage-YYYYMMDD-HHMMSS.<ext>)
        #[arg(short, long, value_name = "FILE", conflicts_with = "data_uri")]
        output: Option<PathBuf>,

        /// Print a data URI to stdout instead of writing a file
        #[arg(long)]
        data_uri: bool,
    },

    /// List available layouts
    Layouts,

    /// Serve the HTTP API
    Serve {
        #[arg(long, default_value = "127.0.0.1:8080")]
        listen: String,

        /// Directory of .ttf/.otf files to register
        #[arg(long, value_name = "DIR")]
        font_dir: Option<PathBuf>,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), CollageError> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Layouts => {
            for layout in Layout::ALL {
                println!("{}", layout.name());
            }
            Ok(())
        }

        Commands::Serve { listen, font_dir } => {
            let config = ServerConfig {
                listen_addr: listen,
                font_dir,
                ..ServerConfig::default()
            };
            runtime()?.block_on(server::serve(config))
        }

        Commands::Combine {
            images,
            layout,
            gap,
            title,
            labels,
            background,
            label_color,
            label_background,
            font_size,
            font_family,
            font_dir,
            canonical_width,
            format,
            output,
            data_uri,
        } => {
            if labels.len() > images.len() {
                return Err(CollageError::InvalidOption(format!(
                    "{} labels for {} images",
                    labels.len(),
                    images.len()
                )));
            }
            let items: Vec<CombineItem> = images
                .iter()
                .enumerate()
                .map(|(i, source)| {
                    CombineItem::new(source.as_str(), labels.get(i).cloned().unwrap_or_default())
                })
                .collect();

            let mut options = CombineOptions::default()
                .with_layout(layout)
                .with_gap(gap)
                .with_background(background)
                .with_label_style(LabelStyle {
                    font_color: label_color,
                    background_color: label_background,
                    font_size,
                    font_family,
                });
            if let Some(title) = title {
                options = options.with_title(title);
            }

            let format = format
                .or_else(|| output.as_deref().and_then(format_from_extension))
                .unwrap_or_default();
            let config = EngineConfig::default()
                .with_canonical_width(canonical_width)
                .with_output_format(format);

            let mut fonts = FontBook::new();
            if let Some(dir) = &font_dir {
                let count = fonts.load_dir(dir)?;
                tracing::info!(dir = %dir.display(), count, "fonts registered");
            }

            let compositor = Compositor::new()?
                .with_fonts(fonts)
                .with_config(config);
            let encoded = runtime()?.block_on(compositor.combine(&items, &options))?;

            if data_uri {
                println!("{}", encoded.to_data_uri());
                return Ok(());
            }

            let path = output.unwrap_or_else(|| default_filename(format));
            std::fs::write(&path, &encoded.bytes)?;
            println!(
                "Wrote {}x{} {} to {}",
                encoded.width,
                encoded.height,
                encoded.mime(),
                path.display()
            );
            Ok(())
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn runtime() -> Result<tokio::runtime::Runtime, CollageError> {
    Ok(tokio::runtime::Runtime::new()?)
}

fn format_from_extension(path: &Path) -> Option<OutputFormat> {
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(|e| e.parse().ok())
}

/// `collage-YYYYMMDD-HHMMSS.<ext>` in the current directory.
fn default_filename(format: OutputFormat) -> PathBuf {
    let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
    PathBuf::from(format!("collage-{}.{}", stamp, format.extension()))
}
