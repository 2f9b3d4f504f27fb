use whisper_endpoints_core::{EndpointTable, Issue, validate};

/// Validate the table, returning the printable report and whether it holds any error.
pub fn run(table: &EndpointTable) -> (String, bool) {
    let issues = validate(table);
    let failed = issues.iter().any(Issue::is_error);
    if issues.is_empty() {
        return ("all endpoints look fine".to_string(), false);
    }
    let report = issues.iter().map(Issue::to_string).collect::<Vec<_>>().join("\n");
    (report, failed)
}

#[cfg(test)]
mod test {
    use whisper_endpoints_core::EndpointKey;

    use super::*;

    #[test]
    fn defaults_pass_with_warnings() {
        let (report, failed) = run(&EndpointTable::defaults());
        assert!(!failed);
        assert!(report.contains("warning: MASTER_SERVER_PROTOCOL"));
    }

    #[test]
    fn bad_port_fails() {
        let mut table = EndpointTable::defaults();
        table.set(EndpointKey::MasterServerPort, "http").unwrap();
        let (report, failed) = run(&table);
        assert!(failed);
        assert!(report.contains("error: MASTER_SERVER_PORT"));
    }
}
