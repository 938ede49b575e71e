use implementations::{LabelledEndpoint, VcApiClient};
use interop_report::{Matrix, Outcome, ReportError};

use super::{judge, Expectation, Issued};
use crate::runner::{Cell, Runner};

pub const TITLE_SUFFIX: &str = "(interop)";

/// Sends the credential of every issuer to every verifier.
///
/// Rows are issuers, columns are verifiers. Every cell expects the credential
/// to verify; cells of an issuer that failed to issue are skipped.
pub async fn interop_matrix(
    tag: &str,
    client: &VcApiClient,
    issued: &[Issued],
    verifiers: &[LabelledEndpoint<'_>],
    runner: &Runner,
) -> Result<Matrix, ReportError> {
    let columns = verifiers.iter().map(|v| v.label.clone()).collect();
    let mut matrix = Matrix::new(format!("{tag} {TITLE_SUFFIX}"), "Issuer", "Verifier", columns);

    let mut cells = Vec::new();
    for Issued {
        label: issuer,
        credential,
        ..
    } in issued
    {
        for verifier in verifiers {
            cells.push(Cell {
                row: issuer.clone(),
                column: verifier.label.clone(),
                input: (verifier.endpoint, credential),
            });
        }
    }

    runner
        .run(&mut matrix, cells, move |(endpoint, credential)| async move {
            match credential {
                Ok(credential) => judge(Expectation::Accept, client.verify(endpoint, credential).await),
                Err(reason) => Outcome::skipped(format!("issuance failed: {reason}")),
            }
        })
        .await?;

    // issuers stay listed even without verifiers
    for Issued { label, .. } in issued {
        matrix.add_row(label);
    }

    Ok(matrix)
}
