//! # signup CLI Entry Point
//!
//! Assembles subcommands and dispatches to handler modules.

use std::process::ExitCode;

use clap::Parser;

/// Signup form toolchain.
///
/// Checks form files against the field schema, queries the email
/// verification and place lookup services, and runs complete submissions.
#[derive(Parser, Debug)]
#[command(name = "signup", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Schema-validate a form file.
    Check(signup_cli::check::CheckArgs),
    /// Check one email address for deliverability.
    VerifyEmail(signup_cli::verify_email::VerifyEmailArgs),
    /// Resolve a place id to a canonical address.
    LookupPlace(signup_cli::lookup_place::LookupPlaceArgs),
    /// Run a form through validation and store it.
    Submit(signup_cli::submit::SubmitArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check(args) => signup_cli::check::run(&args),
        Commands::VerifyEmail(args) => signup_cli::verify_email::run(&args).await,
        Commands::LookupPlace(args) => signup_cli::lookup_place::run(&args).await,
        Commands::Submit(args) => signup_cli::submit::run(&args).await,
    }
}
