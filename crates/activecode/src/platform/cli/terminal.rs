use std::io::{self, Write};
use std::ops::Range;

use ariadne::{Config, Label, Report, ReportKind, Source};

use crate::capture::{Failure, ResultPresentation};

/// Draws result panels as plain text. The terminal counterpart of the
/// document's fixed result container.
pub struct TerminalSurface<W: Write> {
    out: W,
    source_label: String,
}

impl<W: Write> TerminalSurface<W> {
    /// `source_label` names the program in failure excerpts.
    pub fn new(out: W, source_label: impl Into<String>) -> Self {
        Self {
            out,
            source_label: source_label.into(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Returns the rendered height in lines. A panel nothing was written to
    /// stays hidden and takes no space.
    pub fn render(
        &mut self,
        presentation: &ResultPresentation,
        failure: Option<&Failure>,
        source: &str,
    ) -> io::Result<u32> {
        if !presentation.is_visible() {
            return Ok(0);
        }
        let mut panel = String::new();
        if let Some(header) = presentation.header() {
            panel.push_str(header);
            panel.push_str("\n\n");
        }
        panel.push_str(presentation.log().text());
        if !panel.ends_with('\n') {
            panel.push('\n');
        }
        if let Some(failure) = failure {
            panel.push_str(&failure_report(&self.source_label, source, failure)?);
        }
        self.out.write_all(panel.as_bytes())?;
        self.out.flush()?;
        Ok(u32::try_from(panel.lines().count()).unwrap_or(u32::MAX))
    }
}

fn failure_report(source_label: &str, source: &str, failure: &Failure) -> io::Result<String> {
    let Some(line) = failure.line else {
        return Ok(String::new());
    };
    let span = line_span(source, line);
    let mut report_bytes = Vec::new();
    Report::build(ReportKind::Error, (source_label, span.clone()))
        .with_config(Config::default().with_color(false))
        .with_message(failure.to_string())
        .with_label(Label::new((source_label, span)).with_message(&failure.class_name))
        .finish()
        .write((source_label, Source::from(source)), &mut report_bytes)?;
    Ok(String::from_utf8_lossy(&report_bytes).into_owned())
}

/// Char range of the 1-based `line`, without its line terminator. Lines past
/// the end map to an empty range at the end of the source.
fn line_span(source: &str, line: u32) -> Range<usize> {
    let mut start = 0;
    for (index, text) in source.split_inclusive('\n').enumerate() {
        if index + 1 == line as usize {
            let length = text.trim_end_matches(['\n', '\r']).chars().count();
            return start..start + length;
        }
        start += text.chars().count();
    }
    start..start
}
