//! Command-line interface definitions.
//!
//! ```text
//! tosker [OPTIONS] <FILE> <COMMAND>... [--input NAME=VALUE]...
//! ```
//!
//! Commands are deployment phases and run in the order given, e.g.
//! `tosker hello.yaml create start`.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use super::paths;
use crate::domain::Phase;

/// Deploy TOSCA-style topologies onto a container runtime
#[derive(Parser, Debug)]
#[command(name = "tosker")]
#[command(version, about)]
pub struct Cli {
    /// Color output mode [auto, always, never]
    #[arg(
        long,
        global = true,
        default_value = "auto",
        hide_possible_values = true
    )]
    pub color: ColorChoice,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to the configuration file
    #[arg(short, long, default_value_os_t = paths::default_config())]
    pub config: PathBuf,

    /// Parent directory for deployment workspaces (overrides the config file)
    #[arg(long, value_name = "DIR")]
    pub workspace: Option<PathBuf>,

    /// Template file
    pub file: PathBuf,

    /// Phases to run, in order
    #[arg(required = true, value_enum)]
    pub commands: Vec<Command>,

    /// Template input (repeatable)
    #[arg(short, long = "input", value_name = "NAME=VALUE")]
    pub inputs: Vec<String>,
}

/// Color output mode for terminal rendering.
#[derive(Clone, Debug, Default, ValueEnum)]
pub enum ColorChoice {
    /// Detect automatically
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl ColorChoice {
    /// Whether output to a stream gets ANSI styling.
    #[must_use]
    pub const fn ansi(&self, is_terminal: bool) -> bool {
        match self {
            Self::Auto => is_terminal,
            Self::Always => true,
            Self::Never => false,
        }
    }
}

/// A deployment phase named on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Command {
    /// Create the network and every node
    Create,
    /// Start persistent containers and software
    Start,
    /// Stop containers and software
    Stop,
    /// Delete containers, software, network, and workspace
    Delete,
}

impl From<Command> for Phase {
    fn from(command: Command) -> Self {
        match command {
            Command::Create => Phase::Create,
            Command::Start => Phase::Start,
            Command::Stop => Phase::Stop,
            Command::Delete => Phase::Delete,
        }
    }
}

impl Cli {
    /// Requested phases, in order.
    #[must_use]
    pub fn phases(&self) -> Vec<Phase> {
        self.commands.iter().copied().map(Phase::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_name() {
        assert_eq!(Cli::command().get_name(), "tosker");
    }

    #[test]
    fn test_parse_phases_in_order() {
        let cli = Cli::try_parse_from(["tosker", "hello.yaml", "create", "start"]).unwrap();
        assert_eq!(cli.file, PathBuf::from("hello.yaml"));
        assert_eq!(cli.phases(), [Phase::Create, Phase::Start]);
        assert!(cli.inputs.is_empty());
    }

    #[test]
    fn test_phase_is_required() {
        assert!(Cli::try_parse_from(["tosker", "hello.yaml"]).is_err());
    }

    #[test]
    fn test_unknown_phase_is_rejected() {
        assert!(Cli::try_parse_from(["tosker", "hello.yaml", "restart"]).is_err());
    }

    #[test]
    fn test_parse_inputs() {
        let cli = Cli::try_parse_from([
            "tosker",
            "hello.yaml",
            "create",
            "--input",
            "port=80",
            "-i",
            "name=web",
        ])
        .unwrap();
        assert_eq!(cli.inputs, ["port=80", "name=web"]);
    }

    #[test]
    fn test_parse_global_flags() {
        let cli = Cli::try_parse_from([
            "tosker", "--json", "-q", "-vv", "--color", "never", "hello.yaml", "stop",
        ])
        .unwrap();
        assert!(cli.json);
        assert!(cli.quiet);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.color, ColorChoice::Never));
    }

    #[test]
    fn test_color_choice_decides_ansi() {
        assert!(!ColorChoice::Never.ansi(true));
        assert!(ColorChoice::Always.ansi(false));
        assert!(ColorChoice::Auto.ansi(true));
        assert!(!ColorChoice::Auto.ansi(false));
    }

    #[test]
    fn test_parse_workspace_override() {
        let cli =
            Cli::try_parse_from(["tosker", "--workspace", "/srv/ws", "hello.yaml", "delete"])
                .unwrap();
        assert_eq!(cli.workspace, Some(PathBuf::from("/srv/ws")));
    }
}
