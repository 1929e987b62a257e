use std::path::Path;

use nl_api::{check_project, CheckProjectOptions};
use nl_core::ProjectReport;

use crate::source::read_test_case;
use crate::{ExpectedDiagnostic, NlToolError, TestCase};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub observed_diagnostics: Vec<ExpectedDiagnostic>,
    pub report: ProjectReport,
}

pub fn run_case(fixture_dir: &Path, case: &TestCase) -> Result<RunReport, NlToolError> {
    let mut options = CheckProjectOptions::new(fixture_dir);
    options.scenes_dir = case.scenes_dir.clone();
    options.exclude_dirs = case.exclude_dirs.clone();
    let report = check_project(&options)?;

    let mut observed_diagnostics = report
        .diagnostics()
        .into_iter()
        .map(ExpectedDiagnostic::from_diagnostic)
        .collect::<Vec<_>>();
    observed_diagnostics.sort_by(|left, right| left.sort_order(right));

    Ok(RunReport {
        observed_diagnostics,
        report,
    })
}

pub fn assert_case(fixture_dir: &Path, case_path: &Path) -> Result<(), NlToolError> {
    let case = read_test_case(case_path)?;
    let report = run_case(fixture_dir, &case)?;

    let mut expected_diagnostics = case.expected_diagnostics.clone();
    expected_diagnostics.sort_by(|left, right| left.sort_order(right));

    if report.observed_diagnostics.len() != expected_diagnostics.len() {
        let observed = serde_json::to_string_pretty(&report.observed_diagnostics)
            .map_err(NlToolError::DiagnosticSerialize)?;
        return Err(NlToolError::DiagnosticCountMismatch {
            expected: expected_diagnostics.len(),
            actual: report.observed_diagnostics.len(),
            observed,
        });
    }

    for (index, (expected, actual)) in expected_diagnostics
        .iter()
        .zip(report.observed_diagnostics.iter())
        .enumerate()
    {
        if expected != actual {
            return Err(NlToolError::DiagnosticMismatch {
                index,
                expected: expected.to_string(),
                actual: actual.to_string(),
            });
        }
    }

    Ok(())
}
