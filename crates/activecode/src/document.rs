//! Executable document builder.
//!
//! An [`ExecutableDocument`] is a complete standalone HTML page: the Brython
//! interpreter and highlight.js in the head, the result panel styles, and a
//! `text/python` script holding the capture runtime followed by the user's
//! program as an escaped string literal. The page runs itself on load.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::capture::RUNTIME_SCRIPT;
use crate::config::CssLength;
use crate::escape::{decode_script_string_literal, html_attribute, script_string_literal};

const RESULT_PANEL_CSS: &str = include_str!("document/result.css");

/// Name under which the capture runtime expects the program text.
const PROGRAM_BINDING: &str = "program";

/// Where the document loads its interpreter and highlighter from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeAssets {
    pub brython: String,
    pub brython_stdlib: String,
    pub highlight_script: String,
    pub highlight_stylesheet: String,
}

impl Default for RuntimeAssets {
    fn default() -> Self {
        Self {
            brython: "https://cdn.jsdelivr.net/npm/brython@3.9.5/brython.min.js".to_owned(),
            brython_stdlib: "https://cdn.jsdelivr.net/npm/brython@3.9.5/brython_stdlib.min.js"
                .to_owned(),
            highlight_script: "https://cdnjs.cloudflare.com/ajax/libs/highlight.js/11.0.1/highlight.min.js"
                .to_owned(),
            highlight_stylesheet:
                "https://cdnjs.cloudflare.com/ajax/libs/highlight.js/11.0.1/styles/default.min.css"
                    .to_owned(),
        }
    }
}

/// The `<style>` contents of a document: the static result panel rules plus
/// the panel height derived from the surface height.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyleBlock(String);

impl StyleBlock {
    /// The panel never grows past half of the rendering surface.
    pub fn for_surface_height(height: &CssLength) -> Self {
        let mut css = String::with_capacity(RESULT_PANEL_CSS.len() + 64);
        css.push_str(RESULT_PANEL_CSS);
        css.push_str(".container-pre { max-height: calc(");
        css.push_str(height.as_str());
        css.push_str(" / 2); }\n");
        Self(css)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The program text, encoded as a script string literal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EscapedProgram(String);

impl EscapedProgram {
    pub fn encode(program_text: &str) -> Self {
        Self(script_string_literal(program_text))
    }

    /// The literal exactly as it appears in the document, quotes included.
    pub fn literal(&self) -> &str {
        &self.0
    }

    pub fn decode(&self) -> Result<String, serde_json::Error> {
        decode_script_string_literal(&self.0)
    }
}

/// A generated, self-contained document. Immutable once built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecutableDocument {
    assets: RuntimeAssets,
    style: StyleBlock,
    payload: EscapedProgram,
    html: String,
}

impl ExecutableDocument {
    pub fn assets(&self) -> &RuntimeAssets {
        &self.assets
    }

    pub fn style(&self) -> &StyleBlock {
        &self.style
    }

    pub fn payload(&self) -> &EscapedProgram {
        &self.payload
    }

    pub fn as_str(&self) -> &str {
        &self.html
    }

    pub fn into_string(self) -> String {
        self.html
    }
}

impl fmt::Display for ExecutableDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.html)
    }
}

#[derive(Clone, Debug, Default)]
pub struct DocumentBuilder {
    assets: RuntimeAssets,
    interpreter_variant: Option<String>,
}

impl DocumentBuilder {
    pub fn new(assets: RuntimeAssets) -> Self {
        Self {
            assets,
            interpreter_variant: None,
        }
    }

    pub fn with_interpreter_variant(mut self, variant: Option<String>) -> Self {
        self.interpreter_variant = variant;
        self
    }

    pub fn interpreter_variant(&self) -> Option<&str> {
        self.interpreter_variant.as_deref()
    }

    pub fn build(&self, program_text: &str, height_hint: &CssLength) -> ExecutableDocument {
        let style = StyleBlock::for_surface_height(height_hint);
        let payload = EscapedProgram::encode(program_text);
        let html = render(&self.assets, self.interpreter_variant.as_deref(), &style, &payload);
        log::debug!(
            "built executable document: {} bytes, program {} bytes",
            html.len(),
            program_text.len()
        );
        ExecutableDocument {
            assets: self.assets.clone(),
            style,
            payload,
            html,
        }
    }
}

fn render(
    assets: &RuntimeAssets,
    interpreter_variant: Option<&str>,
    style: &StyleBlock,
    payload: &EscapedProgram,
) -> String {
    let mut html = String::with_capacity(
        RUNTIME_SCRIPT.len() + style.as_str().len() + payload.literal().len() + 1024,
    );
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    if let Some(variant) = interpreter_variant {
        push_tag(&mut html, "<meta name=\"python3-interpreter\" content=\"", variant, "\">");
    }
    push_tag(&mut html, "<script type=\"text/javascript\" src=\"", &assets.brython, "\"></script>");
    push_tag(
        &mut html,
        "<script type=\"text/javascript\" src=\"",
        &assets.brython_stdlib,
        "\"></script>",
    );
    push_tag(&mut html, "<link rel=\"stylesheet\" href=\"", &assets.highlight_stylesheet, "\">");
    push_tag(&mut html, "<script src=\"", &assets.highlight_script, "\"></script>");
    html.push_str("<style>\n");
    html.push_str(style.as_str());
    html.push_str("</style>\n</head>\n<body onload=\"brython()\">\n<script type=\"text/python\">\n");
    html.push_str(RUNTIME_SCRIPT);
    html.push('\n');
    html.push_str(PROGRAM_BINDING);
    html.push_str(" = ");
    html.push_str(payload.literal());
    html.push('\n');
    html.push_str("run_program(");
    html.push_str(PROGRAM_BINDING);
    html.push_str(")\nafter_render()\n</script>\n</body>\n</html>\n");
    html
}

fn push_tag(html: &mut String, open: &str, attribute_value: &str, close: &str) {
    html.push_str(open);
    html.push_str(&html_attribute(attribute_value));
    html.push_str(close);
    html.push('\n');
}
