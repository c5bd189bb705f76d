//! Terminal rendering of deployment progress.
//!
//! [`Console`] is the [`Reporter`] handed to the lifecycle controller by the
//! CLI. It renders each event as a human-readable line (with colored
//! markers) or, in JSON mode, as one `{"type": ..., "payload": ...}` object
//! per line for scripting.
//!
//! ```text
//! Deploy order:
//!   1. data
//!   2. server
//!   3. app
//!
//! CREATE
//!   data ✓
//!   server ✓
//!   app ×
//!   app: `docker exec ...` exited with status 1: ...
//! ```

use std::fmt::Display;
use std::io::Write;

use owo_colors::{OwoColorize, Stream};
use parking_lot::Mutex;
use serde_json::json;

use crate::port::{Event, Reporter};

/// Output configuration chosen on the command line.
///
/// Controls output formatting behavior including JSON mode for scripting
/// and quiet mode for reduced output.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    /// Emit machine-readable JSON output instead of human-readable text.
    pub json: bool,
    /// Suppress non-essential output.
    pub quiet: bool,
}

impl OutputConfig {
    /// Create a new output configuration.
    #[must_use]
    pub const fn new(json: bool, quiet: bool) -> Self {
        Self { json, quiet }
    }

    /// Check if regular (non-JSON) output should be suppressed.
    const fn suppressed(self) -> bool {
        !self.json && self.quiet
    }
}

/// Progress renderer for stdout, errors on stderr.
pub struct Console {
    config: OutputConfig,
    /// Serializes writes so a node line and its marker stay together.
    stdout: Mutex<()>,
}

impl Console {
    #[must_use]
    pub fn new(config: OutputConfig) -> Self {
        Self {
            config,
            stdout: Mutex::new(()),
        }
    }

    /// Print an error line on stderr. Never suppressed.
    pub fn error(&self, message: &str) {
        if self.config.json {
            eprintln!(
                "{}",
                json!({
                    "type": "error",
                    "payload": { "message": message },
                })
            );
            return;
        }

        eprintln!(
            "{} {}",
            "error:".if_supports_color(Stream::Stderr, |s| s.red()),
            message
        );
    }

    /// Emit a JSON line with type and payload structure.
    fn emit_json_line(&self, kind: &str, payload: serde_json::Value) {
        let _guard = self.stdout.lock();
        println!(
            "{}",
            json!({
                "type": kind,
                "payload": payload,
            })
        );
    }

    fn json(&self, event: &Event) {
        match event {
            Event::DeployOrder { nodes } => self.emit_json_line("deploy_order", json!({ "nodes": nodes })),
            Event::PhaseStarted(phase) => {
                self.emit_json_line("phase", json!({ "phase": phase.as_str() }));
            }
            Event::NodeStarted { node } => self.emit_json_line("node_started", json!({ "node": node })),
            Event::NodeSucceeded { node } => {
                self.emit_json_line("node_succeeded", json!({ "node": node }));
            }
            Event::NodeFailed { node, error } => self.emit_json_line(
                "node_failed",
                json!({
                    "node": node,
                    "error": error,
                }),
            ),
            Event::OutputsStarted => {}
            Event::Output { name, value } => self.emit_json_line(
                "output",
                json!({
                    "name": name,
                    "value": value,
                }),
            ),
        }
    }

    fn text(&self, event: &Event) {
        let _guard = self.stdout.lock();
        let mut out = std::io::stdout().lock();
        // A closed stdout is not worth aborting a deployment over.
        let _ = render(&mut out, event).and_then(|()| out.flush());
    }
}

/// Write the human-readable form of `event`.
///
/// `NodeStarted` leaves the line open for the marker that follows it. The
/// failure line repeats the node name since quiet mode drops `NodeStarted`.
fn render(out: &mut impl Write, event: &Event) -> std::io::Result<()> {
    match event {
        Event::DeployOrder { nodes } => {
            writeln!(out, "Deploy order:")?;
            for (position, node) in nodes.iter().enumerate() {
                writeln!(out, "  {}. {node}", position + 1)?;
            }
            Ok(())
        }
        Event::PhaseStarted(phase) => writeln!(
            out,
            "\n{}",
            phase
                .as_str()
                .to_uppercase()
                .if_supports_color(Stream::Stdout, |s| s.bold())
        ),
        Event::NodeStarted { node } => write!(out, "  {node}"),
        Event::NodeSucceeded { .. } => {
            writeln!(out, " {}", "✓".if_supports_color(Stream::Stdout, |s| s.green()))
        }
        Event::NodeFailed { node, error } => writeln!(
            out,
            " {}\n  {node}: {error}",
            "×".if_supports_color(Stream::Stdout, |s| s.red())
        ),
        Event::OutputsStarted => writeln!(out, "\nOUTPUTS:"),
        Event::Output { name, value } => writeln!(out, "  - {}: {}", name, highlight(value)),
    }
}

fn highlight(value: impl Display) -> String {
    format!("{}", value.if_supports_color(Stream::Stdout, |s| s.cyan()))
}

impl Reporter for Console {
    fn report(&self, event: Event) {
        if self.config.json {
            self.json(&event);
            return;
        }
        // Failures stay visible in quiet mode.
        if self.config.suppressed() && !matches!(event, Event::NodeFailed { .. }) {
            return;
        }
        self.text(&event);
    }
}
