use nl_core::NodeLinkError;
use std::fmt::Display;

fn map_error(code: &'static str, error: impl Display) -> NodeLinkError {
    NodeLinkError::new(code, error.to_string())
}

pub(crate) fn emit_error(error: NodeLinkError) -> i32 {
    println!("RESULT:ERROR");
    println!("ERROR_CODE:{}", error.code);
    println!(
        "ERROR_MSG_JSON:{}",
        serde_json::to_string(&error.message).unwrap_or_else(|_| "\"Unknown error\"".to_string())
    );
    if let Some(path) = error.path {
        println!(
            "ERROR_PATH_JSON:{}",
            serde_json::to_string(&path).unwrap_or_else(|_| "\"\"".to_string())
        );
    }
    1
}

pub(crate) fn map_cli_project_path(error: std::io::Error) -> NodeLinkError {
    map_error("CLI_PROJECT_PATH", error)
}

pub(crate) fn map_cli_output(error: serde_json::Error) -> NodeLinkError {
    map_error("CLI_OUTPUT", error)
}

#[cfg(test)]
mod error_map_tests {
    use super::*;

    #[test]
    fn emit_error_returns_non_zero_exit_code() {
        assert_eq!(emit_error(NodeLinkError::new("ERR", "failed")), 1);
        assert_eq!(
            emit_error(NodeLinkError::with_path("ERR", "failed", "scenes/a.tscn")),
            1
        );
    }

    #[test]
    fn mapping_helpers_keep_error_codes() {
        assert_eq!(
            map_cli_project_path(std::io::Error::other("cwd")).code,
            "CLI_PROJECT_PATH"
        );
        let json_error =
            serde_json::from_str::<serde_json::Value>("{").expect_err("invalid json");
        assert_eq!(map_cli_output(json_error).code, "CLI_OUTPUT");
    }
}
