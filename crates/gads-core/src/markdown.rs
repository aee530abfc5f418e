//! Markdown building blocks for reports.

use std::fmt::Write;

/// Pipe table with a header row.
#[derive(Debug, Clone, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn row<I, S>(&mut self, cells: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "| {} |", self.headers.join(" | "));
        let _ = writeln!(
            out,
            "|{}|",
            self.headers.iter().map(|_| "---").collect::<Vec<_>>().join("|")
        );
        for row in &self.rows {
            let cells: Vec<String> = row.iter().map(|c| escape_cell(c)).collect();
            let _ = writeln!(out, "| {} |", cells.join(" | "));
        }
        out
    }
}

fn escape_cell(cell: &str) -> String {
    cell.replace('|', "\\|").replace('\n', " ")
}

/// `- **Label**: value`
pub fn field(out: &mut String, label: &str, value: impl std::fmt::Display) {
    let _ = writeln!(out, "- **{}**: {}", label, value);
}

pub fn status_icon(status: &str) -> &'static str {
    match status {
        "ENABLED" => "✅",
        "PAUSED" => "⏸️",
        "REMOVED" => "🗑️",
        _ => "❓",
    }
}

pub fn match_type_icon(match_type: &str) -> &'static str {
    match match_type {
        "EXACT" => "🎯",
        "PHRASE" => "📝",
        "BROAD" => "🌐",
        _ => "•",
    }
}

/// First `max` characters of `text`, with an ellipsis when shortened.
pub fn clip(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

/// Horizontal bar for distribution charts, one block per unit.
pub fn bar(count: usize, max_width: usize) -> String {
    "█".repeat(count.min(max_width))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_render() {
        let mut table = Table::new(&["Name", "Status"]);
        table.row(["Summer | Sale", "PAUSED"]);
        let rendered = table.render();
        assert_eq!(
            rendered,
            "| Name | Status |\n|---|---|\n| Summer \\| Sale | PAUSED |\n"
        );
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_clip() {
        assert_eq!(clip("short", 10), "short");
        assert_eq!(clip("a very long headline", 10), "a very ...");
    }

    #[test]
    fn test_icons() {
        assert_eq!(status_icon("PAUSED"), "⏸️");
        assert_eq!(match_type_icon("EXACT"), "🎯");
        assert_eq!(bar(3, 2), "██");
    }
}
