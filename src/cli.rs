use clap::Parser;

use drone_plugin_helper::env::DEFAULT_PREFIX;
use drone_plugin_helper::runner::Settings;

/// Drone plugin that runs `helm` with arguments built from `PLUGIN_*`
/// settings.
#[derive(Parser, Debug)]
#[command(
    name = "drone-helm",
    about = "Run helm from Drone plugin settings",
    version
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, env = "DRONE_HELM_VERBOSE")]
    pub verbose: bool,

    /// Prefix of the environment variables holding plugin settings
    #[arg(long, env = "DRONE_HELM_PREFIX", default_value = DEFAULT_PREFIX)]
    pub prefix: String,

    /// Program to run
    #[arg(long, env = "DRONE_HELM_PROGRAM", default_value = "helm")]
    pub program: String,

    /// Fail on settings that no helm option accepts
    #[arg(long, env = "DRONE_HELM_STRICT")]
    pub strict: bool,

    /// Print the helm invocation instead of running it
    #[arg(short = 'd', long, env = "DRONE_HELM_DRY_RUN")]
    pub dry_run: bool,
}

impl Cli {
    /// Runner settings selected on the command line.
    pub const fn settings(&self) -> Settings {
        Settings {
            strict: self.strict,
            dry_run: self.dry_run,
        }
    }
}
