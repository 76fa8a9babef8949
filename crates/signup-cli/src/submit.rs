//! # Submit Subcommand
//!
//! Plays a form file through [`SignupOrchestrator`] the way the form host
//! would: load the values, blur the email field, optionally pick an address
//! suggestion, then submit to a [`JsonFileSink`].
//!
//! Service problems are reported but never stop the run. Only field errors
//! block the submission.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use signup_client::{
    AutocompleteHandle, AutocompleteOptions, EmailVerificationClient, PlacesClient, ServiceConfig,
};
use signup_state::{
    JsonFileSink, NoticeLevel, OrchestratorSettings, SignupOrchestrator, SubmitError,
};

/// Arguments for the submit subcommand.
#[derive(Args, Debug)]
pub struct SubmitArgs {
    /// Form file (JSON, or YAML with a .yaml/.yml extension).
    #[arg(long)]
    pub form: PathBuf,

    /// JSON file accepted sign-ups are appended to.
    #[arg(long)]
    pub out: PathBuf,

    /// Pick this place as the address suggestion before submitting.
    #[arg(long)]
    pub place_id: Option<String>,

    /// Skip the remote email check.
    #[arg(long)]
    pub skip_email_check: bool,
}

pub async fn run(args: &SubmitArgs) -> anyhow::Result<ExitCode> {
    let config = ServiceConfig::from_env()?;
    let values = crate::form_file::load(&args.form)?;

    let verifier = Arc::new(EmailVerificationClient::new(&config)?);
    let sink = Arc::new(JsonFileSink::new(&args.out));
    let timeout = Duration::from_secs(config.timeout_secs);
    let orchestrator = SignupOrchestrator::new(verifier, sink).with_settings(OrchestratorSettings {
        verify_timeout: timeout,
        resolve_timeout: timeout,
    });
    orchestrator.load_values(values);

    if !args.skip_email_check {
        let state = orchestrator.on_email_blur().await;
        tracing::info!(%state, "email check finished");
    }

    match PlacesClient::new(&config) {
        Ok(client) => {
            orchestrator.on_script_loaded();
            let handle = Arc::new(AutocompleteHandle::new(client, AutocompleteOptions::default()));
            if let Some(place_id) = &args.place_id {
                handle.select(place_id.as_str());
            }
            orchestrator.on_widget_ready(handle);
            if args.place_id.is_some() {
                let outcome = orchestrator.on_place_changed().await;
                tracing::info!(?outcome, "address selection handled");
            }
        }
        Err(e) => orchestrator.on_script_error(e.to_string()),
    }

    for notice in orchestrator.notices() {
        match notice.level {
            NoticeLevel::Info => println!("{}", notice.message),
            NoticeLevel::Error => eprintln!("{}", notice.message),
        }
    }

    match orchestrator.submit() {
        Ok(values) => {
            println!("submitted {} {} <{}>", values.first_name, values.last_name, values.email);
            Ok(ExitCode::SUCCESS)
        }
        Err(SubmitError::Invalid(errors)) => {
            eprint!("{}", crate::check::render(&errors));
            Ok(ExitCode::FAILURE)
        }
        Err(e @ SubmitError::Sink(_)) => Err(e.into()),
    }
}
