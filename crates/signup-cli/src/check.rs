//! # Check Subcommand
//!
//! Runs the field schema over a form file without contacting any service.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use signup_core::{validate, FieldErrors};

/// Arguments for the check subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Form file (JSON, or YAML with a .yaml/.yml extension).
    #[arg(long)]
    pub form: PathBuf,

    /// Print errors as a JSON object keyed by field name.
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: &CheckArgs) -> anyhow::Result<ExitCode> {
    let values = crate::form_file::load(&args.form)?;
    let errors = validate(&values);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&errors)?);
    } else {
        print!("{}", render(&errors));
    }
    Ok(if errors.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// One line per failing field, or `ok`.
pub fn render(errors: &FieldErrors) -> String {
    if errors.is_empty() {
        return "ok\n".to_string();
    }
    errors
        .iter()
        .map(|(field, message)| format!("{field}: {message}\n"))
        .collect()
}
