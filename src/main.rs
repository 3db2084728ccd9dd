//! `drone-helm`: a Drone plugin that runs `helm` with arguments built from
//! its `PLUGIN_*` settings.
use std::process::ExitCode;

use anyhow::{Context as _, Result};
use clap::Parser;

use drone_plugin_helper::env;
use drone_plugin_helper::exec::SystemLauncher;
use drone_plugin_helper::logging;
use drone_plugin_helper::names::Initialisms;
use drone_plugin_helper::runner::{Completion, Runner};

mod cli;
mod helm;

fn main() -> Result<ExitCode> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();
    logging::init_subscriber(args.verbose);

    let initialisms = Initialisms::common().context("building initialism table")?;
    let vars = env::from_process(&args.prefix).context("reading plugin settings")?;
    tracing::debug!("{} plugin settings found under {}", vars.len(), args.prefix);

    let runner = Runner::new(args.settings(), initialisms, SystemLauncher);
    let outcome = runner
        .exec_command::<helm::HelmCommand>(&args.program, &vars)
        .with_context(|| format!("running {}", args.program))?;

    match outcome.completion {
        Completion::DryRun => {
            let json = outcome
                .invocation
                .to_json()
                .context("rendering invocation")?;
            #[allow(clippy::print_stdout)]
            {
                println!("{json}");
            }
            Ok(ExitCode::SUCCESS)
        }
        Completion::Exited(code) => Ok(ExitCode::from(u8::try_from(code).unwrap_or(1))),
        Completion::Signalled => {
            tracing::error!("{} was terminated by a signal", args.program);
            Ok(ExitCode::FAILURE)
        }
    }
}
