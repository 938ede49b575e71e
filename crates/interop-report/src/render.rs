use std::{
    fmt::Write as _,
    fs,
    path::{Path, PathBuf},
};

use tracing::info;

use crate::{
    errors::ReportError,
    matrix::{Matrix, Outcome, Report},
};

const JSON_REPORT: &str = "report.json";
const MARKDOWN_REPORT: &str = "report.md";

/// Renders the report as Markdown tables, one per matrix, followed by the
/// reasons of every failed cell.
pub fn render_markdown(report: &Report) -> String {
    let mut out = String::new();
    let summary = report.summary();

    // Writing to a String cannot fail.
    let _ = writeln!(out, "# {} Interoperability Report\n", report.tag);
    let _ = writeln!(out, "Generated at {}.\n", report.generated_at.to_rfc3339());
    let _ = writeln!(
        out,
        "**{}** passed, **{}** failed, **{}** skipped.\n",
        summary.passed, summary.failed, summary.skipped
    );

    for matrix in &report.matrices {
        render_matrix(&mut out, matrix);
    }

    out
}

fn render_matrix(out: &mut String, matrix: &Matrix) {
    let _ = writeln!(out, "## {}\n", matrix.title);

    if matrix.columns.is_empty() {
        let _ = writeln!(out, "_No implementations._\n");
        return;
    }

    let header: Vec<String> = std::iter::once(&matrix.row_label)
        .chain(matrix.columns.iter())
        .map(|s| escape(s))
        .collect();
    let _ = writeln!(out, "| {} |", header.join(" | "));
    let _ = writeln!(out, "|{}", "---|".repeat(header.len()));

    for row in &matrix.rows {
        let cells: Vec<&str> = matrix
            .columns
            .iter()
            .map(|c| match row.cells.get(c) {
                Some(Outcome::Passed) => "✓",
                Some(Outcome::Failed { .. }) => "✗",
                Some(Outcome::Skipped { .. }) => "-",
                None => "?",
            })
            .collect();
        let _ = writeln!(out, "| {} | {} |", escape(&row.name), cells.join(" | "));
    }

    let summaries: Vec<String> = matrix
        .columns
        .iter()
        .map(|c| {
            let s = matrix.column_summary(c);
            format!("{}/{}", s.passed, s.total())
        })
        .collect();
    let _ = writeln!(out, "| **Passed** | {} |\n", summaries.join(" | "));

    let failures = matrix.failures();
    if !failures.is_empty() {
        let _ = writeln!(out, "### Failures\n");
        for (row, column, reason) in failures {
            let _ = writeln!(out, "- **{}** / {}: {}", escape(column), escape(row), escape(reason));
        }
        let _ = writeln!(out);
    }
}

fn escape(cell: &str) -> String {
    cell.replace('|', "\\|").replace('\n', " ")
}

/// Writes `report.json` and `report.md` into `dir`, creating it when needed.
pub fn write_report(dir: impl AsRef<Path>, report: &Report) -> Result<Vec<PathBuf>, ReportError> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).map_err(|source| ReportError::Write {
        path: dir.to_path_buf(),
        source,
    })?;

    let outputs = [
        (dir.join(JSON_REPORT), report.to_json()?),
        (dir.join(MARKDOWN_REPORT), render_markdown(report)),
    ];

    let mut written = Vec::with_capacity(outputs.len());
    for (path, content) in outputs {
        fs::write(&path, content).map_err(|source| ReportError::Write {
            path: path.clone(),
            source,
        })?;
        info!("wrote {}", path.display());
        written.push(path);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use tempdir::TempDir;

    use super::*;

    fn report() -> Report {
        let mut matrix = Matrix::new(
            "Ed25519Signature2020 (verify)",
            "Test Name",
            "Verifier",
            vec!["Acme".to_string(), "Globex|Corp".to_string()],
        );
        matrix.record("valid", "Acme", Outcome::Passed).unwrap();
        matrix.record("valid", "Globex|Corp", Outcome::failed("status 500")).unwrap();
        matrix.record("tampered", "Acme", Outcome::skipped("no fixture")).unwrap();

        let mut report = Report::new("Ed25519Signature2020");
        report.push(matrix);
        report.push(Matrix::new("Ed25519Signature2020 (interop)", "Issuer", "Verifier", vec![]));
        report
    }

    #[test]
    fn test_render_markdown() {
        let md = render_markdown(&report());

        assert!(md.starts_with("# Ed25519Signature2020 Interoperability Report"));
        assert!(md.contains("**1** passed, **1** failed, **1** skipped."));
        assert!(md.contains("| Test Name | Acme | Globex\\|Corp |"));
        assert!(md.contains("|---|---|---|"));
        assert!(md.contains("| valid | ✓ | ✗ |"));
        assert!(md.contains("| tampered | - | ? |"));
        assert!(md.contains("| **Passed** | 1/2 | 0/1 |"));
        assert!(md.contains("- **Globex\\|Corp** / valid: status 500"));
        assert!(md.contains("_No implementations._"));
    }

    #[test]
    fn test_failure_reasons_stay_on_one_line() {
        let mut matrix = Matrix::new("verify", "Test Name", "Verifier", vec!["Acme".to_string()]);
        matrix
            .record("valid", "Acme", Outcome::failed("status 500: <html>\n| oops |\n</html>"))
            .unwrap();
        let mut report = Report::new("Ed25519Signature2020");
        report.push(matrix);

        let md = render_markdown(&report);
        assert!(md.contains("- **Acme** / valid: status 500: <html> \\| oops \\| </html>\n"));
    }

    #[test]
    fn test_write_report_creates_directory() {
        let tmp = TempDir::new("report").unwrap();
        let dir = tmp.path().join("nested/out");

        let written = write_report(&dir, &report()).unwrap();
        assert_eq!(written, vec![dir.join("report.json"), dir.join("report.md")]);

        let json: Report = serde_json::from_str(&fs::read_to_string(dir.join("report.json")).unwrap()).unwrap();
        assert_eq!(json, report_without_time(json.clone()));
        assert_eq!(json.matrices.len(), 2);
    }

    // generated_at differs between calls; compare everything else.
    fn report_without_time(parsed: Report) -> Report {
        Report {
            generated_at: parsed.generated_at,
            ..report()
        }
    }
}
