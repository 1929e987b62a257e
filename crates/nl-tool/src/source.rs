use std::fs;
use std::path::Path;

use crate::{NlToolError, TestCase, TESTCASE_SCHEMA_V1};

pub fn read_test_case(case_path: &Path) -> Result<TestCase, NlToolError> {
    let raw = fs::read_to_string(case_path).map_err(|source| NlToolError::ReadFile {
        path: case_path.to_path_buf(),
        source,
    })?;
    let parsed: TestCase = serde_json::from_str(&raw).map_err(|source| NlToolError::ParseCase {
        path: case_path.to_path_buf(),
        source,
    })?;

    if parsed.schema_version != TESTCASE_SCHEMA_V1 {
        return Err(NlToolError::InvalidSchemaVersion {
            expected: TESTCASE_SCHEMA_V1.to_string(),
            found: parsed.schema_version,
        });
    }

    Ok(parsed)
}
