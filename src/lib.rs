//! Conformance and interoperability suite for Ed25519Signature2020.
//!
//! Issuers and verifiers declared in manifest files are driven over the
//! VC-API; their answers to valid and malformed credentials are laid out in
//! an interop report.

pub mod config;
pub mod mutations;
pub mod runner;
pub mod suites;

use di_utils::proof::ProofInspector;
use eyre::{eyre, Result, WrapErr};
use implementations::{Registry, RetryOptions, Role, VcApiClient};
use interop_report::{Report, Summary};
use tracing::{info, warn};

use config::SuiteConfig;
use runner::Runner;
use suites::{create::create_matrix, interop::interop_matrix, issue_all, reference_credential, verify::verify_matrix};

/// Exit status when some cell failed and nonconformance is fatal.
pub const EXIT_NONCONFORMANT: u8 = 1;

/// Exit status of runs aborted by the harness itself: bad configuration,
/// unreadable manifests or an unwritable report directory.
pub const EXIT_HARNESS_ERROR: u8 = 2;

/// Maps the outcome of a run to the process exit status.
///
/// Failed cells only affect the status when `fail_on_nonconformance` is set.
pub fn exit_status<E>(result: &Result<Summary, E>, fail_on_nonconformance: bool) -> u8 {
    match result {
        Err(_) => EXIT_HARNESS_ERROR,
        Ok(summary) if fail_on_nonconformance && summary.failed > 0 => EXIT_NONCONFORMANT,
        Ok(_) => 0,
    }
}

/// Loads the implementations selected by `config` and runs every suite against them.
pub async fn run(config: &SuiteConfig) -> Result<Report> {
    let registry = load_registry(config)?;
    if registry.is_empty() {
        warn!(
            "no implementation in {} is tagged {}",
            config.implementations_dir.display(),
            config.tag
        );
    }

    let issuers = registry.endpoints(Role::Issuer);
    let verifiers = registry.endpoints(Role::Verifier);
    info!(
        "testing {} implementations: {} issuers, {} verifiers",
        registry.len(),
        issuers.len(),
        verifiers.len()
    );

    let client = VcApiClient::new(
        config.http_timeout,
        RetryOptions::new().retries(config.http_retries),
    )
    .wrap_err("failed to set up the VC-API client")?;
    let runner = Runner::new(config.max_concurrency);

    let issued = issue_all(&client, &issuers, config.max_concurrency).await;
    let reference = reference_credential(&issued, config.reference_issuer.as_deref());
    match reference {
        Some(reference) => info!("reference credential issued by {}", reference.label),
        None => warn!("no reference credential, verification cases will be skipped"),
    }

    let mut report = Report::new(&config.tag);
    report.push(create_matrix(&config.tag, &issued, &ProofInspector::default())?);
    report.push(verify_matrix(&config.tag, &client, &verifiers, reference, &runner).await?);
    report.push(interop_matrix(&config.tag, &client, &issued, &verifiers, &runner).await?);

    Ok(report)
}

fn load_registry(config: &SuiteConfig) -> Result<Registry> {
    let mut registry = Registry::load_dir(&config.implementations_dir)?;
    if let Some(only) = &config.only {
        registry = registry.only(only)?;
    }
    let registry = registry.filter(&config.tag);

    if let Some(name) = &config.reference_issuer {
        let has_issuer = registry
            .get(name)
            .map_or(false, |i| !i.endpoints(Role::Issuer).is_empty());
        if !has_issuer {
            return Err(eyre!("reference issuer `{name}` has no issuer tagged {}", config.tag));
        }
    }

    Ok(registry)
}
