use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

const PREVIEW_LIMIT: usize = 64;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct RecordOutput<'a> {
    index: usize,
    offset: u64,
    size: usize,
    prefix: &'a str,
    payload: String,
}

/// Prints records one at a time; the table format is emitted once at the end.
pub struct RecordPrinter {
    format: OutputFormat,
    prefix: String,
    table: Option<Table>,
}

impl RecordPrinter {
    pub fn new(format: OutputFormat, prefix: String) -> Self {
        let table = matches!(format, OutputFormat::Table).then(|| {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["INDEX", "OFFSET", "SIZE", "PAYLOAD"]);
            table
        });
        Self {
            format,
            prefix,
            table,
        }
    }

    pub fn record(&mut self, index: usize, offset: u64, payload: &[u8]) {
        match self.format {
            OutputFormat::Json => {
                let out = RecordOutput {
                    index,
                    offset,
                    size: payload.len(),
                    prefix: &self.prefix,
                    payload: payload_preview(payload),
                };
                println!(
                    "{}",
                    serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
                );
            }
            OutputFormat::Table => {
                if let Some(table) = self.table.as_mut() {
                    table.add_row(vec![
                        index.to_string(),
                        offset.to_string(),
                        payload.len().to_string(),
                        payload_preview(payload),
                    ]);
                }
            }
            OutputFormat::Pretty => {
                println!(
                    "record={} offset={} size={} prefix={} payload={}",
                    index,
                    offset,
                    payload.len(),
                    self.prefix,
                    payload_preview(payload)
                );
            }
            OutputFormat::Raw => print_raw(payload),
        }
    }

    pub fn finish(self) {
        if let Some(table) = self.table {
            println!("{table}");
        }
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

fn payload_preview(payload: &[u8]) -> String {
    match std::str::from_utf8(payload) {
        Ok(text) if text.chars().count() <= PREVIEW_LIMIT => text.to_string(),
        Ok(text) => {
            let head: String = text.chars().take(PREVIEW_LIMIT).collect();
            format!("{head}…")
        }
        Err(_) => format!("<binary {} bytes>", payload.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_text_and_binary() {
        assert_eq!(payload_preview(b"Hi"), "Hi");
        assert_eq!(payload_preview(&[0xFF, 0x00]), "<binary 2 bytes>");
    }

    #[test]
    fn preview_truncates_long_text() {
        let long = "a".repeat(PREVIEW_LIMIT + 10);
        let preview = payload_preview(long.as_bytes());
        assert_eq!(preview.chars().count(), PREVIEW_LIMIT + 1);
        assert!(preview.ends_with('…'));
    }
}
