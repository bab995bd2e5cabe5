//! Printing for the one-shot subcommands.

use anyhow::Result;
use caseorg_core::{ResultRow, ResultsRenderer};
use is_terminal::IsTerminal;
use owo_colors::OwoColorize;
use serde::Serialize;

use crate::types::OutputFormat;

/// Colour only when stdout is a terminal
#[derive(Debug, Clone, Copy)]
pub struct Painter {
    color: bool,
}

impl Painter {
    pub fn detect() -> Self {
        Self {
            color: std::io::stdout().is_terminal(),
        }
    }

    pub fn plain() -> Self {
        Self { color: false }
    }

    pub fn heading(&self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn dim(&self, text: &str) -> String {
        if self.color {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn ok(&self, text: &str) -> String {
        if self.color {
            text.green().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn error(&self, text: &str) -> String {
        if self.color {
            text.red().bold().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn folder(&self, text: &str) -> String {
        if self.color {
            text.blue().bold().to_string()
        } else {
            text.to_string()
        }
    }
}

/// One result row as printed with `--format json`
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RowView {
    Placeholder { text: String },
    File {
        name: String,
        path: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        rel: Option<String>,
        href: String,
        deletable: bool,
    },
    Directory { name: String, path: String },
    Up { path: String },
    Empty,
    Error { message: String },
}

impl From<&ResultRow> for RowView {
    fn from(row: &ResultRow) -> Self {
        match row {
            ResultRow::Placeholder(text) => RowView::Placeholder { text: text.clone() },
            ResultRow::Record(record) => RowView::File {
                name: record.record.file.clone(),
                path: record.record.path.clone(),
                rel: record.record.rel.clone(),
                href: record.download_href.clone(),
                deletable: record.deletable,
            },
            ResultRow::Directory { name, path } => RowView::Directory {
                name: name.clone(),
                path: path.to_string(),
            },
            ResultRow::Up { parent } => RowView::Up {
                path: parent.to_string(),
            },
            ResultRow::Empty => RowView::Empty,
            ResultRow::Error(message) => RowView::Error {
                message: message.clone(),
            },
        }
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Text lines for the rows currently on the surface
pub fn format_rows(renderer: &ResultsRenderer, painter: Painter) -> Vec<String> {
    renderer
        .rows()
        .iter()
        .map(|row| match row {
            ResultRow::Record(record) => {
                let location = record
                    .record
                    .rel
                    .as_deref()
                    .map(|rel| format!("  {}", painter.dim(rel)))
                    .unwrap_or_default();
                format!(
                    "{}{}\n    {}",
                    record.display_name,
                    location,
                    painter.dim(&record.download_href)
                )
            }
            ResultRow::Directory { .. } | ResultRow::Up { .. } => painter.folder(&row.label()),
            ResultRow::Error(_) => painter.error(&row.label()),
            ResultRow::Placeholder(_) | ResultRow::Empty => painter.dim(&row.label()),
        })
        .collect()
}

pub fn print_rows(renderer: &ResultsRenderer, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let rows: Vec<RowView> = renderer.rows().iter().map(RowView::from).collect();
            print_json(&rows)
        }
        OutputFormat::Plain => {
            for line in format_rows(renderer, Painter::detect()) {
                println!("{}", line);
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use caseorg_core::RendererSettings;
    use caseorg_types::SearchResultRecord;

    #[test]
    fn test_plain_rows_without_color() {
        let mut renderer = ResultsRenderer::new(RendererSettings::default());
        renderer.render(Some(&[SearchResultRecord::new(
            "Vakalatnama.pdf",
            "2024/Mar/Doe v. Roe/Vakalatnama.pdf",
        )
        .with_rel("2024/Mar/Doe v. Roe")]));

        insta::assert_snapshot!(format_rows(&renderer, Painter::plain()).join("\n"), @r"
        Vakalatnama.pdf  2024/Mar/Doe v. Roe
            http://127.0.0.1:5000/static-serve?path=2024%2FMar%2FDoe%20v.%20Roe%2FVakalatnama.pdf&download=1
        ");
    }

    #[test]
    fn test_row_view_json_shape() {
        let view = RowView::from(&ResultRow::Error("File not found".to_string()));
        assert_eq!(
            serde_json::to_value(&view).unwrap(),
            serde_json::json!({"kind": "error", "message": "File not found"})
        );
    }
}
