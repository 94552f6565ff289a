use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
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

/// Record that can be printed in every output format.
pub trait Render: Serialize {
    fn headers() -> Vec<&'static str>;
    fn row(&self) -> Vec<String>;
    fn pretty(&self) -> String;
}

/// Print `items` in the requested format. JSON output is one object per line.
pub fn print_records<T: Render>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            for item in items {
                println!(
                    "{}",
                    serde_json::to_string(item).unwrap_or_else(|_| "{}".to_string())
                );
            }
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(T::headers());
            for item in items {
                table.add_row(item.row());
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for item in items {
                println!("{}", item.pretty());
            }
        }
    }
}

pub fn payload_preview(payload: &[u8]) -> String {
    match std::str::from_utf8(payload) {
        Ok(text) => text.to_string(),
        Err(_) => format!("<binary {} bytes>", payload.len()),
    }
}

pub fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02X}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_falls_back_for_binary() {
        assert_eq!(payload_preview(b"hello"), "hello");
        assert_eq!(payload_preview(&[0xFF, 0xFE]), "<binary 2 bytes>");
    }

    #[test]
    fn hex_is_uppercase() {
        assert_eq!(hex(&[0x0A, 0xBC]), "0ABC");
    }
}
