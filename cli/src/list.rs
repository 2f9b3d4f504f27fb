use std::fmt::Write;

use anyhow::Result;
use serde::Serialize;
use whisper_endpoints_core::{EndpointKey, EndpointTable};

#[derive(Serialize)]
struct Entry<'a> {
    name: &'static str,
    value: &'a str,
    overridden: bool,
}

/// Render the table as `NAME = value` lines in declaration order, `*` marking overridden values.
pub fn render(table: &EndpointTable) -> String {
    let width = EndpointKey::ALL.iter().map(|key| key.name().len()).max().unwrap_or(0);
    let mut out = String::new();
    for (key, value) in table.iter() {
        let mark = if table.is_overridden(key) { " *" } else { "" };
        let _ = writeln!(out, "{:<width$} = {}{}", key.name(), value, mark, width = width);
    }
    out
}

pub fn render_json(table: &EndpointTable) -> Result<String> {
    let entries: Vec<Entry> = table
        .iter()
        .map(|(key, value)| Entry { name: key.name(), value, overridden: table.is_overridden(key) })
        .collect();
    Ok(serde_json::to_string_pretty(&entries)?)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn text_marks_overrides() {
        let mut table = EndpointTable::defaults();
        table.set(EndpointKey::MasterServerHost, "10.0.0.2").unwrap();
        let text = render(&table);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), EndpointKey::COUNT);
        assert!(lines[0].starts_with("SUPPORT_DOMAIN "));
        assert!(lines[0].ends_with("= http://support.whispersystems.org"));
        assert!(lines[3].ends_with("= 10.0.0.2 *"));
    }

    #[test]
    fn json_keeps_order() {
        let json = render_json(&EndpointTable::defaults()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let entries = value.as_array().unwrap();
        assert_eq!(entries.len(), EndpointKey::COUNT);
        assert_eq!(entries[1]["name"], "infrastructureTestHostName");
        assert_eq!(entries[1]["value"], "relay.whispersystems.org");
        assert_eq!(entries[1]["overridden"], false);
    }
}
