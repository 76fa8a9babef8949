//! # Lookup-Place Subcommand
//!
//! Resolves a place id the way a widget selection would, through an
//! [`AutocompleteHandle`] and [`resolve_place`].

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Args;
use signup_client::{AutocompleteHandle, AutocompleteOptions, PlacesClient, ServiceConfig};
use signup_state::{resolve_place, AddressResolutionOutcome};

/// Arguments for the lookup-place subcommand.
#[derive(Args, Debug)]
pub struct LookupPlaceArgs {
    /// Place id, as returned in an autocomplete suggestion.
    pub place_id: String,
}

pub async fn run(args: &LookupPlaceArgs) -> anyhow::Result<ExitCode> {
    let config = ServiceConfig::from_env()?;
    let client = PlacesClient::new(&config).context("place lookup is unavailable")?;
    let handle = Arc::new(AutocompleteHandle::new(client, AutocompleteOptions::default()));
    handle.select(args.place_id.as_str());

    let timeout = Duration::from_secs(config.timeout_secs);
    match resolve_place(handle.as_ref(), timeout).await {
        AddressResolutionOutcome::Resolved(address) => {
            println!("{}", address.formatted);
            if let Some(postal_code) = &address.postal_code {
                println!("postal code: {postal_code}");
            }
            Ok(ExitCode::SUCCESS)
        }
        AddressResolutionOutcome::NoSelection => {
            eprintln!("no place with id {}", args.place_id);
            Ok(ExitCode::FAILURE)
        }
        AddressResolutionOutcome::Failed { reason } => {
            eprintln!("lookup failed: {reason}");
            Ok(ExitCode::FAILURE)
        }
        AddressResolutionOutcome::NotReady => Ok(ExitCode::FAILURE),
    }
}
