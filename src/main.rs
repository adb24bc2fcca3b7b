// codepane - syntax-highlighted code blocks for the terminal
//
// Renders read-only code blocks in a scrolling gallery:
// - Widget (ratatui): header with language tag and copy button, numbered gutter, body
// - Highlighting (syntect): explicit language tags or first-line detection
// - Clipboard (arboard): copy a block's exact source text
// - Assets: syntax and theme definitions load once, shared by every block

mod cli;
mod config;
mod gallery;
mod logging;
mod samples;

use anyhow::{Context, Result};
use codepane::{BlockTheme, CodeBlock};
use config::{Config, LogRotation};
use gallery::GalleryItem;
use logging::{LogBuffer, TuiLogLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Handle CLI commands first (config --show, --reset, --edit, --update)
    // If a command was handled, exit early
    let Some(args) = cli::handle_cli() else {
        return Ok(());
    };

    // Ensure config template exists (helps users discover options)
    Config::ensure_config_exists();

    let config = Config::from_env();

    // Capture logs in a ring buffer for the footer. Logging straight to
    // stdout would garble the alternate screen.
    let log_buffer = LogBuffer::new();

    // Precedence: RUST_LOG env var > config file > default "info"
    let default_filter = format!("codepane={}", config.logging.level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());

    // Set up file logging if enabled (non-blocking writer with rotation)
    // The guard must be kept alive for the duration of the program to ensure logs flush
    let _file_guard: Option<tracing_appender::non_blocking::WorkerGuard> =
        if config.logging.file_enabled {
            if let Err(e) = std::fs::create_dir_all(&config.logging.file_dir) {
                eprintln!(
                    "Warning: Could not create log directory {:?}: {}",
                    config.logging.file_dir, e
                );
                // Fall back to buffer-only logging
                tracing_subscriber::registry()
                    .with(filter)
                    .with(TuiLogLayer::new(log_buffer.clone()))
                    .init();
                None
            } else {
                // Rolling file appender based on configured rotation
                let file_appender = match config.logging.file_rotation {
                    LogRotation::Hourly => tracing_appender::rolling::hourly(
                        &config.logging.file_dir,
                        &config.logging.file_prefix,
                    ),
                    LogRotation::Daily => tracing_appender::rolling::daily(
                        &config.logging.file_dir,
                        &config.logging.file_prefix,
                    ),
                    LogRotation::Never => tracing_appender::rolling::never(
                        &config.logging.file_dir,
                        &config.logging.file_prefix,
                    ),
                };

                // Non-blocking writer: file writes happen on a background thread
                let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

                // File layer uses JSON format for structured log parsing
                tracing_subscriber::registry()
                    .with(filter)
                    .with(TuiLogLayer::new(log_buffer.clone()))
                    .with(
                        tracing_subscriber::fmt::layer()
                            .json()
                            .with_writer(non_blocking)
                            .with_ansi(false),
                    )
                    .init();

                Some(guard)
            }
        } else {
            // No file logging - buffer layer only
            tracing_subscriber::registry()
                .with(filter)
                .with(TuiLogLayer::new(log_buffer.clone()))
                .init();
            None
        };

    let items = build_items(&config, &args)?;

    tracing::debug!("Gallery starting with {} blocks", items.len());

    gallery::run(items, log_buffer).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Build gallery items from the command line, or the built-in samples
fn build_items(config: &Config, args: &cli::RunArgs) -> Result<Vec<GalleryItem>> {
    if args.files.is_empty() {
        let items = samples::samples()
            .into_iter()
            .map(|sample| {
                let language = args.language.as_deref().or(sample.language);
                GalleryItem::new(
                    sample.caption,
                    sample.source,
                    build_block(config, args, language),
                )
            })
            .collect();
        return Ok(items);
    }

    let mut items = Vec::with_capacity(args.files.len());
    for path in &args.files {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        // Explicit -l wins, then the file extension, then first-line detection
        let extension = path.extension().and_then(|e| e.to_str());
        let language = args.language.as_deref().or(extension);

        items.push(GalleryItem::new(
            path.display().to_string(),
            source,
            build_block(config, args, language),
        ));
    }
    Ok(items)
}

/// One block, styled from CLI overrides over the loaded config
fn build_block(config: &Config, args: &cli::RunArgs, language: Option<&str>) -> CodeBlock {
    let theme_name = args.theme.as_deref().unwrap_or(&config.theme);
    let mut block = CodeBlock::new()
        .width(args.width.unwrap_or(config.width))
        .height(args.height.unwrap_or(config.height))
        .theme(BlockTheme::by_name(theme_name));

    if let Some(language) = language {
        block = block.language(language);
    }
    block
}
