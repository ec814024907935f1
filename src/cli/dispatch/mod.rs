use crate::{cli::actions::Action, options::Options};
use anyhow::{Context, Result};
use clap::ArgMatches;

/// Convert `ArgMatches` into typed Action enum
///
/// # Errors
///
/// Returns an error if the host argument is missing
pub fn dispatch(matches: &ArgMatches) -> Result<Action> {
    let host = matches
        .get_one::<String>("host")
        .context("host is required")?
        .clone();

    let port = matches
        .get_one::<String>("port")
        .cloned()
        .unwrap_or_else(|| String::from("443"));

    let options = Options {
        timeout: matches.get_one::<u64>("timeout").copied().unwrap_or(5),
        server_name: matches.get_one::<String>("server-name").cloned(),
        min_version: matches.get_one::<String>("min-version").cloned(),
        max_version: matches.get_one::<String>("max-version").cloned(),
        certs_only: matches.get_flag("certs-only"),
        verify_server_certificate: matches.get_flag("verify"),
    };

    Ok(Action::Grab {
        host,
        port,
        options,
    })
}
