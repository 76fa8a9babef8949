//! # Verify-Email Subcommand
//!
//! One deliverability check against the configured verification service.

use std::process::ExitCode;

use clap::Args;
use signup_client::{EmailVerificationClient, EmailVerifier, ServiceConfig, VerificationOutcome};

/// Arguments for the verify-email subcommand.
#[derive(Args, Debug)]
pub struct VerifyEmailArgs {
    /// Address to check.
    pub email: String,
}

pub async fn run(args: &VerifyEmailArgs) -> anyhow::Result<ExitCode> {
    let config = ServiceConfig::from_env()?;
    let client = EmailVerificationClient::new(&config)?;
    if !client.is_configured() {
        tracing::warn!("SIGNUP_EMAIL_VALIDATION_API_KEY not set; the check will fail");
    }

    match client.verify(&args.email).await {
        VerificationOutcome::Checked(report) => {
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(if report.valid {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        VerificationOutcome::Failed(failure) => {
            eprintln!("could not verify {}: {failure}", args.email.trim());
            Ok(ExitCode::from(2))
        }
    }
}
