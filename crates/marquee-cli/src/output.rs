//! Output formatting for CLI

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use marquee_core::{DisplaySurface, StatusText};
use serde::Serialize;
use std::time::Duration;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl From<&str> for OutputFormat {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => OutputFormat::Json,
            _ => OutputFormat::Text,
        }
    }
}

/// One thing the display was asked to do
#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DisplayLine<'a> {
    Loading,
    Content,
    Image { url: &'a str },
    Video { url: &'a str },
    Status { name: &'a str, current: usize, total: usize },
    Error { message: &'a str },
}

/// Format one display line
pub fn render_line(line: &DisplayLine<'_>, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => serde_json::to_string(line).unwrap_or_else(|_| "{}".to_string()),
        OutputFormat::Text => match line {
            DisplayLine::Loading => "Loading playlist...".to_string(),
            DisplayLine::Content => "Playlist ready".to_string(),
            DisplayLine::Image { url } => format!("{} {}", style("image").cyan(), url),
            DisplayLine::Video { url } => format!("{} {}", style("video").magenta(), url),
            DisplayLine::Status {
                name,
                current,
                total,
            } => format!("{} [{}/{}]", style(name).bold(), current, total),
            DisplayLine::Error { message } => format!("{} {}", style("Error:").red().bold(), message),
        },
    }
}

/// Terminal implementation of the display surfaces
pub struct ConsoleDisplay {
    format: OutputFormat,
    spinner: Option<ProgressBar>,
}

impl ConsoleDisplay {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            spinner: None,
        }
    }

    fn emit(&self, line: DisplayLine<'_>) {
        println!("{}", render_line(&line, self.format));
    }

    fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }
}

impl DisplaySurface for ConsoleDisplay {
    fn show_image(&mut self, url: &str) {
        self.emit(DisplayLine::Image { url });
    }

    fn show_video(&mut self, url: &str) {
        self.emit(DisplayLine::Video { url });
    }

    fn set_status(&mut self, status: &StatusText) {
        self.emit(DisplayLine::Status {
            name: &status.name,
            current: status.current,
            total: status.total,
        });
    }

    fn show_loading(&mut self) {
        match self.format {
            OutputFormat::Text => {
                let spinner = ProgressBar::new_spinner();
                spinner.set_style(
                    ProgressStyle::with_template("{spinner} {msg}")
                        .unwrap_or_else(|_| ProgressStyle::default_spinner()),
                );
                spinner.set_message("Loading playlist...");
                spinner.enable_steady_tick(Duration::from_millis(100));
                self.spinner = Some(spinner);
            }
            OutputFormat::Json => self.emit(DisplayLine::Loading),
        }
    }

    fn show_content(&mut self) {
        self.stop_spinner();
        self.emit(DisplayLine::Content);
    }

    fn show_error(&mut self, message: &str) {
        self.stop_spinner();
        match self.format {
            OutputFormat::Text => eprintln!("{}", render_line(&DisplayLine::Error { message }, self.format)),
            OutputFormat::Json => self.emit(DisplayLine::Error { message }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_str() {
        assert_eq!(OutputFormat::from("JSON"), OutputFormat::Json);
        assert_eq!(OutputFormat::from("text"), OutputFormat::Text);
        assert_eq!(OutputFormat::from("table"), OutputFormat::Text);
    }

    #[test]
    fn test_json_lines() {
        let line = render_line(&DisplayLine::Image { url: "https://cdn/a.jpg" }, OutputFormat::Json);
        assert_eq!(line, r#"{"event":"image","url":"https://cdn/a.jpg"}"#);

        let line = render_line(
            &DisplayLine::Status {
                name: "North Gym",
                current: 2,
                total: 5,
            },
            OutputFormat::Json,
        );
        assert_eq!(line, r#"{"event":"status","name":"North Gym","current":2,"total":5}"#);
    }

    #[test]
    fn test_text_lines() {
        console::set_colors_enabled(false);
        let line = render_line(
            &DisplayLine::Status {
                name: "North Gym",
                current: 2,
                total: 5,
            },
            OutputFormat::Text,
        );
        assert_eq!(line, "North Gym [2/5]");

        let line = render_line(&DisplayLine::Error { message: "HTTP 404" }, OutputFormat::Text);
        assert_eq!(line, "Error: HTTP 404");
    }
}
