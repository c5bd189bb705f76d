//! Handler for a `tosker <FILE> <COMMAND>...` invocation.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info};

use super::command::Cli;
use crate::adapter::outbound::docker;
use crate::application::{Orchestrator, TemplateLoader, Workspace};
use crate::domain::{Inputs, Phase};
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::port::Reporter;

/// Load the template, wire the Docker runtime, and run each requested phase.
///
/// Outputs are printed after the last phase when it is `create` or `start`.
pub async fn execute(cli: &Cli, config: &Config, reporter: Arc<dyn Reporter>) -> Result<()> {
    let inputs = Inputs::parse(&cli.inputs)?;
    let template = TemplateLoader::load(&cli.file, &inputs)?;

    let base_dir = workspace_base(cli, config);
    let workspace = Workspace::new(&base_dir, template.name());
    debug!(workspace = %workspace.dir().display(), "Using workspace");

    let runtime = docker::runtime(&config.docker.binary, template.name(), &workspace);
    let orchestrator = Orchestrator::new(template, workspace, runtime, reporter)?;

    let phases = cli.phases();
    for phase in &phases {
        orchestrator.run(*phase).await?;
    }

    if prints_outputs(&phases) {
        orchestrator.print_outputs().await?;
    }

    info!(template = %orchestrator.template().name(), "Done");
    Ok(())
}

/// Command-line override first, then the config file.
fn workspace_base(cli: &Cli, config: &Config) -> PathBuf {
    cli.workspace
        .clone()
        .unwrap_or_else(|| config.workspace.base_dir.clone())
}

fn prints_outputs(phases: &[Phase]) -> bool {
    matches!(phases.last(), Some(Phase::Create | Phase::Start))
}
