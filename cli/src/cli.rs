//! CLI argument parsing with clap derive

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags, BehaviourFlags, OutputFlags};
use crate::commands;

/// Deploy Gradio apps to Modal
#[derive(Parser)]
#[command(
    name = "gradio-modal",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Answer prompts with their defaults (also set by CI or GRADIO_MODAL_YES)
    #[arg(short, long, global = true)]
    pub yes: bool,

    /// Log debug diagnostics to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate a Modal deployment file for a Gradio app and deploy it
    Deploy(commands::deploy::DeployArgs),

    /// Log in to Modal
    Auth(commands::auth::AuthArgs),

    /// Check the modal CLI, credentials and account
    SanityCheck,

    /// Stop a deployed app
    KillADeployment(commands::kill::KillArgs),

    /// Stream logs of a deployed app
    MilkLogs(commands::logs::LogsArgs),

    /// Show configuration, credentials and versions
    ConfigInfo(commands::config_info::ConfigInfoArgs),
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self) -> Result<ExitCode> {
        let Cli {
            json,
            quiet,
            no_color,
            yes,
            verbose: _,
            command,
        } = self;
        let app = AppContext::new(&AppFlags {
            output: OutputFlags {
                no_color,
                quiet,
                json,
            },
            behaviour: BehaviourFlags { yes },
        });

        match command {
            Command::Deploy(args) => commands::deploy::run(&app, args).await,
            Command::Auth(args) => commands::auth::run(&app, args).await,
            Command::SanityCheck => commands::sanity_check::run(&app).await,
            Command::KillADeployment(args) => commands::kill::run(&app, args).await,
            Command::MilkLogs(args) => commands::logs::run(&app, args).await,
            Command::ConfigInfo(args) => commands::config_info::run(&app, args).await,
        }
    }
}
