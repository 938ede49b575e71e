use implementations::{LabelledEndpoint, VcApiClient};
use interop_report::{Matrix, Outcome, ReportError};
use serde_json::Value;
use tracing::warn;

use super::{judge, Expectation, Issued};
use crate::{
    mutations::Mutation,
    runner::{Cell, Runner},
};

pub const TITLE_SUFFIX: &str = "(verify)";
pub const VALID_CASE: &str = "MUST verify a valid VC with an Ed25519Signature2020 proof";

struct Case {
    name: &'static str,
    expectation: Expectation,
    credential: Result<Value, String>,
}

// The valid credential first, then one case per mutation.
fn cases(reference: Option<&Issued>) -> Vec<Case> {
    let reference = match reference.map(|r| (&r.label, &r.credential)) {
        Some((label, Ok(credential))) => Ok((label, credential)),
        Some((label, Err(reason))) => Err(format!("reference issuer {label} failed: {reason}")),
        None => Err("no issuer produced a reference credential".to_string()),
    };

    let mut cases = vec![Case {
        name: VALID_CASE,
        expectation: Expectation::Accept,
        credential: reference.clone().map(|(_, credential)| credential.clone()),
    }];

    for mutation in Mutation::ALL {
        let credential = match &reference {
            Ok((label, credential)) => mutation.apply(credential).map_err(|e| {
                warn!("cannot apply {} to the credential of {label}: {e}", mutation.id());
                format!("fixture unavailable: {e}")
            }),
            Err(reason) => Err(reason.clone()),
        };

        cases.push(Case {
            name: mutation.description(),
            expectation: Expectation::Reject,
            credential,
        });
    }

    cases
}

/// Sends the reference credential and its mutations to every verifier.
///
/// Without a reference credential every cell is skipped.
pub async fn verify_matrix(
    tag: &str,
    client: &VcApiClient,
    verifiers: &[LabelledEndpoint<'_>],
    reference: Option<&Issued>,
    runner: &Runner,
) -> Result<Matrix, ReportError> {
    let columns = verifiers.iter().map(|v| v.label.clone()).collect();
    let mut matrix = Matrix::new(format!("{tag} {TITLE_SUFFIX}"), "Test Name", "Verifier", columns);

    let cases = cases(reference);
    for case in &cases {
        matrix.add_row(case.name);
    }

    let mut cells = Vec::new();
    for case in &cases {
        for verifier in verifiers {
            cells.push(Cell {
                row: case.name.to_string(),
                column: verifier.label.clone(),
                input: (verifier.endpoint, case),
            });
        }
    }

    runner
        .run(&mut matrix, cells, move |(endpoint, case)| async move {
            match &case.credential {
                Ok(credential) => judge(case.expectation, client.verify(endpoint, credential).await),
                Err(reason) => Outcome::skipped(reason),
            }
        })
        .await?;

    Ok(matrix)
}
