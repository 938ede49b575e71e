use di_utils::proof::{ProofCheck, ProofInspector, ProofRule};
use interop_report::{Matrix, Outcome, ReportError};
use tracing::info;

use super::Issued;

pub const TITLE_SUFFIX: &str = "(create)";

/// Checks every issued credential against the structural proof rules.
///
/// One row per rule, one column per issuer. An issuer that failed to
/// produce a credential fails every row.
pub fn create_matrix(tag: &str, issued: &[Issued], inspector: &ProofInspector) -> Result<Matrix, ReportError> {
    let columns = issued.iter().map(|i| i.label.clone()).collect();
    let mut matrix = Matrix::new(format!("{tag} {TITLE_SUFFIX}"), "Test Name", "Issuer", columns);

    for rule in ProofRule::ALL {
        matrix.add_row(rule.description());
    }

    for Issued { label, credential, .. } in issued {
        for rule in ProofRule::ALL {
            let outcome = match credential {
                Ok(credential) => match inspector.check(rule, credential) {
                    Ok(ProofCheck::Satisfied) => Outcome::Passed,
                    Ok(ProofCheck::NotApplicable(reason)) => Outcome::skipped(reason),
                    Err(violation) => Outcome::failed(violation.message),
                },
                Err(reason) => Outcome::failed(format!("issuance failed: {reason}")),
            };
            matrix.record(rule.description(), label, outcome)?;
        }
    }

    let summary = matrix.summary();
    info!(
        "{}: {} passed, {} failed, {} skipped",
        matrix.title, summary.passed, summary.failed, summary.skipped
    );
    Ok(matrix)
}
