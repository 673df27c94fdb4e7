//! Renderer backed by an external command
//!
//! The diagram source is written to the command's stdin and the rendered
//! text is read from its stdout. The default command is the figurehead CLI,
//! which converts Mermaid to ASCII art.

use serde::{Deserialize, Serialize};
use std::io::Write;
use std::process::{Command, Stdio};
use std::thread;
use tracing::{debug, trace};

use crate::core::{DiagramRenderer, RenderFailure, SpliceError};

/// Environment variable overriding the renderer command line
pub const RENDERER_ENV: &str = "MERMAID_SPLICE_RENDERER";

/// How to invoke the external renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRendererConfig {
    /// Program to run, looked up on `PATH`
    pub program: String,
    /// Arguments passed before the diagram is piped in
    #[serde(default)]
    pub args: Vec<String>,
    /// Extra environment for the child process
    #[serde(default)]
    pub env: Vec<(String, String)>,
}

impl CommandRendererConfig {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Parse a whitespace-separated command line such as `figurehead convert`
    pub fn from_command_line(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let program = parts.next()?;
        Some(Self {
            program: program.to_string(),
            args: parts.map(str::to_string).collect(),
            env: Vec::new(),
        })
    }

    /// Read the command line from `MERMAID_SPLICE_RENDERER`, if set
    pub fn from_env() -> Option<Self> {
        std::env::var(RENDERER_ENV)
            .ok()
            .and_then(|line| Self::from_command_line(&line))
    }
}

impl Default for CommandRendererConfig {
    fn default() -> Self {
        Self::new("figurehead")
            .arg("convert")
            .arg("--color")
            .arg("never")
            .env("FIGUREHEAD_LOG_LEVEL", "off")
    }
}

/// Renders diagrams by piping them through an external command
#[derive(Debug, Clone, Default)]
pub struct CommandRenderer {
    config: CommandRendererConfig,
}

impl CommandRenderer {
    pub fn new(config: CommandRendererConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CommandRendererConfig {
        &self.config
    }

    fn run(&self, source: &str) -> Result<String, RenderFailure> {
        let program = &self.config.program;
        trace!(program, args = ?self.config.args, "Spawning renderer");

        let mut child = Command::new(program)
            .args(&self.config.args)
            .envs(self.config.env.iter().map(|(k, v)| (k, v)))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| {
                let error = SpliceError::SpawnError {
                    program: program.clone(),
                    source,
                };
                RenderFailure::new(error.to_string())
            })?;

        // stdin is fed on its own thread while stdout is drained below
        let writer = child.stdin.take().map(|mut stdin| {
            let input = format!("{}\n", source);
            thread::spawn(move || {
                // Broken pipes surface through the exit status instead
                let _ = stdin.write_all(input.as_bytes());
            })
        });

        let output = child
            .wait_with_output()
            .map_err(|e| RenderFailure::new(format!("{}: {}", program, e)))?;
        if let Some(writer) = writer {
            let _ = writer.join();
        }

        if !output.status.success() {
            let message = one_line(&String::from_utf8_lossy(&output.stderr));
            debug!(program, status = %output.status, "Renderer rejected diagram");
            return Err(if message.is_empty() {
                RenderFailure::new(format!("{} exited with {}", program, output.status))
            } else {
                RenderFailure::new(message)
            });
        }

        let rendered = String::from_utf8_lossy(&output.stdout)
            .trim_end_matches(['\n', '\r'])
            .to_string();
        if rendered.trim().is_empty() {
            return Err(RenderFailure::new(format!("{} produced no output", program)));
        }
        Ok(rendered)
    }
}

impl DiagramRenderer for CommandRenderer {
    fn render(&self, source: &str) -> Result<String, RenderFailure> {
        self.run(source)
    }

    fn name(&self) -> &str {
        &self.config.program
    }
}

/// Collapse a diagnostic onto one line, dropping a leading `Error: `
fn one_line(stderr: &str) -> String {
    let joined = stderr
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    if let Some(rest) = joined.strip_prefix("Error: ") {
        return rest.to_string();
    }
    joined
}
