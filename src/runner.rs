use std::future::Future;

use futures::{stream, StreamExt};
use interop_report::{Matrix, Outcome, ReportError};
use tracing::{debug, info, warn};

/// One cell of a matrix waiting to be evaluated.
pub struct Cell<T> {
    pub row: String,
    pub column: String,
    pub input: T,
}

/// Evaluates matrix cells with a bounded number of requests in flight.
#[derive(Debug, Clone, Copy)]
pub struct Runner {
    concurrency: usize,
}

impl Runner {
    pub fn new(concurrency: usize) -> Self {
        Self {
            concurrency: concurrency.max(1),
        }
    }

    /// Runs `evaluate` on every cell and records the outcomes into `matrix`.
    ///
    /// Rows are added to the matrix in the order of `cells` before anything
    /// runs, so the layout does not depend on completion order.
    pub async fn run<T, F, Fut>(&self, matrix: &mut Matrix, cells: Vec<Cell<T>>, evaluate: F) -> Result<(), ReportError>
    where
        F: Fn(T) -> Fut,
        Fut: Future<Output = Outcome>,
    {
        for cell in &cells {
            matrix.add_row(&cell.row);
        }

        let results: Vec<(String, String, Outcome)> = stream::iter(cells)
            .map(|Cell { row, column, input }| {
                let outcome = evaluate(input);
                async move { (row, column, outcome.await) }
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        for (row, column, outcome) in results {
            match &outcome {
                Outcome::Failed { reason } => warn!("[{}] {column} failed `{row}`: {reason}", matrix.title),
                _ => debug!("[{}] {column} `{row}`: {outcome:?}", matrix.title),
            }
            matrix.record(&row, &column, outcome)?;
        }

        let summary = matrix.summary();
        info!(
            "{}: {} passed, {} failed, {} skipped",
            matrix.title, summary.passed, summary.failed, summary.skipped
        );
        Ok(())
    }
}
