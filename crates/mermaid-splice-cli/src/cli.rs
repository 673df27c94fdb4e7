//! Command-line interface for the mermaid-splice utility
//!
//! Runs the splicing pipeline over documents or host hook events.

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing::{debug, info};

use mermaid_splice::backends::{CommandRenderer, CommandRendererConfig};
use mermaid_splice::core::logging::{init_logging, LOG_FORMAT_ENV, LOG_LEVEL_ENV};
use mermaid_splice::pipeline::{Splicer, TextCompleteHook};
use mermaid_splice::{SourceSection, SpliceConfig, DEFAULT_FENCE_TAG};

/// mermaid-splice - Render Mermaid blocks in text as ASCII diagrams
#[derive(Parser)]
#[command(name = "mermaid-splice")]
#[command(about = "Replace fenced Mermaid blocks in text with rendered ASCII diagrams")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error|off)
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Log level options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

/// Options shared by every command that renders
#[derive(clap::Args, Debug, Clone, PartialEq, Eq)]
pub struct RenderArgs {
    /// Fence language tag marking diagram blocks
    #[arg(long, default_value = DEFAULT_FENCE_TAG)]
    pub tag: String,

    /// Layout of successfully rendered blocks
    #[arg(long, value_enum, default_value_t = SourceChoice::Collapsible)]
    pub source: SourceChoice,

    /// Renderer command line, e.g. "figurehead convert --style ascii".
    /// Falls back to MERMAID_SPLICE_RENDERER, then "figurehead convert --color never"
    #[arg(long)]
    pub renderer: Option<String>,
}

/// Whether to keep the diagram source next to the rendering
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum SourceChoice {
    /// Rendered block followed by a collapsible source section
    #[default]
    Collapsible,
    /// Rendered block only
    Omitted,
}

impl From<SourceChoice> for SourceSection {
    fn from(value: SourceChoice) -> Self {
        match value {
            SourceChoice::Collapsible => SourceSection::Collapsible,
            SourceChoice::Omitted => SourceSection::Omitted,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render every Mermaid block in a document
    Process {
        /// Input document (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output document (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        render: RenderArgs,
    },

    /// Handle one text-completion event as JSON on stdin
    Hook {
        #[command(flatten)]
        render: RenderArgs,
    },

    /// List Mermaid blocks without rendering them
    Scan {
        /// Input document (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Fence language tag marking diagram blocks
        #[arg(long, default_value = DEFAULT_FENCE_TAG)]
        tag: String,

        /// Show in JSON format
        #[arg(long)]
        json: bool,
    },
}

/// One scanned block as reported by `scan`
#[derive(Debug, Serialize)]
struct BlockReport<'a> {
    index: usize,
    line: usize,
    start: usize,
    end: usize,
    source: &'a str,
}

/// Main CLI application
#[derive(Default)]
pub struct SpliceApp;

impl SpliceApp {
    /// Create a new application instance
    pub fn new() -> Self {
        Self
    }

    /// Run the application with the given CLI arguments
    pub fn run(&mut self, cli: Cli) -> Result<()> {
        // Environment variables take precedence over the flag defaults
        let log_level_str = std::env::var(LOG_LEVEL_ENV)
            .ok()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .unwrap_or_else(|| cli.log_level.as_str().to_string());

        let log_format_str = std::env::var(LOG_FORMAT_ENV)
            .ok()
            .unwrap_or_else(|| cli.log_format.as_str().to_string());

        if let Err(e) = init_logging(Some(&log_level_str), Some(&log_format_str)) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        if cli.verbose {
            eprintln!("mermaid-splice v{}", env!("CARGO_PKG_VERSION"));
        }

        match cli.command {
            Commands::Process {
                input,
                output,
                render,
            } => self.process_command(input, output, render, cli.verbose),
            Commands::Hook { render } => self.hook_command(render, cli.verbose),
            Commands::Scan { input, tag, json } => self.scan_command(input, tag, json),
        }
    }

    /// Build a splicer from command-line options
    ///
    /// The renderer comes from `--renderer`, then `MERMAID_SPLICE_RENDERER`,
    /// then the figurehead default.
    pub fn build_splicer(render: &RenderArgs) -> Result<Splicer> {
        let renderer_config = match render.renderer.as_deref() {
            Some(line) => CommandRendererConfig::from_command_line(line)
                .ok_or_else(|| anyhow!("Renderer command line is empty"))?,
            None => CommandRendererConfig::from_env().unwrap_or_default(),
        };
        debug!(program = %renderer_config.program, "Using renderer");

        let config = SpliceConfig {
            fence_tag: render.tag.clone(),
            source_section: render.source.into(),
            ..SpliceConfig::default()
        };
        Ok(Splicer::with_config(
            CommandRenderer::new(renderer_config),
            config,
        ))
    }

    /// Handle the process command
    fn process_command(
        &self,
        input: Option<PathBuf>,
        output: Option<PathBuf>,
        render: RenderArgs,
        verbose: bool,
    ) -> Result<()> {
        let content = self.read_input(input)?;

        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }

        let splicer = Self::build_splicer(&render)?;
        let outcome = splicer.splice(&content);
        if outcome.is_degraded() {
            eprintln!("Warning: document left unchanged, see trailing comment");
        }
        let text = outcome.into_text();
        info!(bytes = text.len(), "Processed document");

        self.write_output(output, &text)
    }

    /// Handle the hook command
    fn hook_command(&self, render: RenderArgs, verbose: bool) -> Result<()> {
        let event = self.read_input(None)?;

        if verbose {
            eprintln!("Read {} bytes of hook event", event.len());
        }

        let hook = TextCompleteHook::new(Self::build_splicer(&render)?);
        let response = hook
            .handle_json(&event)
            .map_err(|e| anyhow!("Invalid hook event: {}", e))?;

        let mut stdout = io::stdout();
        writeln!(stdout, "{}", response)?;
        stdout.flush()?;
        Ok(())
    }

    /// Handle the scan command
    fn scan_command(&self, input: Option<PathBuf>, tag: String, json: bool) -> Result<()> {
        let content = self.read_input(input)?;
        let blocks = mermaid_splice::pipeline::scan_blocks(&content, &tag);

        let reports: Vec<BlockReport<'_>> = blocks
            .iter()
            .enumerate()
            .map(|(index, block)| BlockReport {
                index,
                line: block.line,
                start: block.start,
                end: block.end,
                source: block.source(),
            })
            .collect();

        if json {
            println!("{}", serde_json::to_string_pretty(&reports)?);
        } else if reports.is_empty() {
            println!("No {} blocks found", tag);
        } else {
            for report in &reports {
                println!(
                    "#{} line {} bytes {}..{} ({} bytes of source)",
                    report.index,
                    report.line,
                    report.start,
                    report.end,
                    report.source.len()
                );
            }
        }
        Ok(())
    }

    /// Read input from file or stdin
    pub fn read_input(&self, input: Option<PathBuf>) -> Result<String> {
        match input {
            Some(path) if path.to_string_lossy() != "-" => fs::read_to_string(&path)
                .map_err(|e| anyhow!("Failed to read input file '{}': {}", path.display(), e)),
            _ => {
                let mut content = String::new();
                io::stdin().read_to_string(&mut content)?;
                Ok(content)
            }
        }
    }

    /// Write output to file or stdout
    ///
    /// The document is written byte-for-byte; no trailing newline is added.
    pub fn write_output(&self, output: Option<PathBuf>, content: &str) -> Result<()> {
        match output {
            Some(path) if path.to_string_lossy() != "-" => fs::write(&path, content)
                .map_err(|e| anyhow!("Failed to write output file '{}': {}", path.display(), e)),
            _ => {
                let mut stdout = io::stdout();
                stdout.write_all(content.as_bytes())?;
                stdout.flush()?;
                Ok(())
            }
        }
    }
}
