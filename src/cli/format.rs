//! Terminal rendering of results

use serde_json::Value;
use unicode_width::UnicodeWidthStr;

const RULE_WIDTH: usize = 50;

/// Surround `body` with a titled frame of `=` rules
pub fn frame(title: &str, body: &str) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    format!("\n{rule}\n{title}\n{rule}\n{body}\n{rule}")
}

/// Render the top-level fields of a JSON object as a Key/Value grid
///
/// Non-object values are rendered as a single `value` row.
pub fn render_table(value: &Value) -> String {
    let rows: Vec<(String, String)> = match value {
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| (k.clone(), cell(v)))
            .collect(),
        other => vec![("value".to_string(), cell(other))],
    };

    let key_width = rows
        .iter()
        .map(|(k, _)| k.width())
        .chain(std::iter::once("Key".len()))
        .max()
        .unwrap_or(0);
    let value_width = rows
        .iter()
        .map(|(_, v)| v.width())
        .chain(std::iter::once("Value".len()))
        .max()
        .unwrap_or(0);

    let border = format!("+{}+{}+", "-".repeat(key_width + 2), "-".repeat(value_width + 2));
    let header_border = border.replace('-', "=");
    let line = |k: &str, v: &str| {
        format!("| {} | {} |", pad(k, key_width), pad(v, value_width))
    };

    let mut out = vec![border.clone(), line("Key", "Value"), header_border];
    for (k, v) in &rows {
        out.push(line(k, v));
        out.push(border.clone());
    }
    if rows.is_empty() {
        out.push(border);
    }
    out.join("\n")
}

/// Pad to `width` terminal columns; wide glyphs take two
fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{text}{}", " ".repeat(fill))
}

fn cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.replace('\n', " "),
        other => other.to_string(),
    }
}
