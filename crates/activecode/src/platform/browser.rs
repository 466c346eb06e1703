//! Collaborators for the zoon playground.
//!
//! Every type here is a cheap handle around shared state so the same editor,
//! layout or sandbox can be moved into the widget and still be turned into
//! elements afterwards.

use std::cell::RefCell;
use std::future::{Future, ready};
use std::rc::Rc;

use zoon::wasm_bindgen::JsValue;
use zoon::*;

use crate::config::CssLength;
use crate::controller::{
    Editor, LayoutContainer, LayoutState, SaveSignal, SaveWorkflow, SizeClass, Transition,
};
use crate::document::ExecutableDocument;
use crate::sandbox::{LoadCounter, RenderingSandbox, SandboxError, SandboxHandle};

pub const LAST_PROGRAM_STORAGE_KEY: &str = "activecode-last-program";

type DomSlot = Rc<RefCell<Option<web_sys::HtmlElement>>>;

// ------ TextAreaEditor ------

/// A plain `<textarea>`. The value is read from the DOM on every call.
#[derive(Clone, Default)]
pub struct TextAreaEditor {
    dom: DomSlot,
    pending: Rc<RefCell<String>>,
}

impl TextAreaEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn element(&self) -> impl Element + use<> {
        RawHtmlEl::new("textarea")
            .attr("spellcheck", "false")
            .attr("autocomplete", "off")
            .style("width", "100%")
            .style("min-height", "12em")
            .style("box-sizing", "border-box")
            .style("font-family", "monospace")
            .after_insert({
                let dom = self.dom.clone();
                let pending = self.pending.clone();
                move |element| {
                    set_value_property(&element, &pending.borrow());
                    dom.replace(Some(element));
                }
            })
            .after_remove({
                let dom = self.dom.clone();
                move |_| {
                    dom.take();
                }
            })
    }
}

impl Editor for TextAreaEditor {
    fn value(&self) -> String {
        let Some(element) = self.dom.borrow().clone() else {
            return self.pending.borrow().clone();
        };
        js_sys::Reflect::get(&element, &JsValue::from_str("value"))
            .ok()
            .and_then(|value| value.as_string())
            .unwrap_or_default()
    }

    fn set_value(&self, value: &str) {
        *self.pending.borrow_mut() = value.to_owned();
        if let Some(element) = self.dom.borrow().as_ref() {
            set_value_property(element, value);
        }
    }
}

fn set_value_property(element: &web_sys::HtmlElement, value: &str) {
    if let Err(error) =
        js_sys::Reflect::set(element, &JsValue::from_str("value"), &JsValue::from_str(value))
    {
        eprintln!("Failed to set editor content: {error:?}");
    }
}

// ------ LocalStorageSave ------

/// Keeps the program of the latest run in local storage.
#[derive(Clone)]
pub struct LocalStorageSave {
    key: &'static str,
    editor: TextAreaEditor,
}

impl LocalStorageSave {
    pub fn new(editor: TextAreaEditor) -> Self {
        Self::with_key(LAST_PROGRAM_STORAGE_KEY, editor)
    }

    pub fn with_key(key: &'static str, editor: TextAreaEditor) -> Self {
        Self { key, editor }
    }

    /// Program stored by an earlier session.
    pub fn stored_program(key: &str) -> Option<String> {
        match local_storage().get::<String>(key) {
            Some(Ok(program)) => Some(program),
            Some(Err(error)) => {
                eprintln!("Failed to load stored program: {error:#?}");
                None
            }
            None => None,
        }
    }
}

impl SaveWorkflow for LocalStorageSave {
    fn manage_scrubber(&self, signal: SaveSignal) -> impl Future<Output = SaveSignal> {
        if signal == SaveSignal::Save {
            let program = self.editor.value();
            if let Err(error) = local_storage().insert(self.key, &program) {
                eprintln!("Failed to store program: {error:#?}");
                return ready(SaveSignal::Skip);
            }
        }
        ready(signal)
    }
}

// ------ ZoonLayout ------

/// Editor/result layout driven by `Mutable`s. Transitions are CSS
/// transitions on the bound properties; starting one only flips the value.
#[derive(Clone)]
pub struct ZoonLayout {
    editor_width: Mutable<SizeClass>,
    editor_transition_ms: Mutable<u32>,
    output_class: Mutable<SizeClass>,
    output_height: Mutable<CssLength>,
    output_mounted: Mutable<bool>,
    output_revealed: Mutable<bool>,
    reveal_transition_ms: Mutable<u32>,
    clear_spacer: Mutable<bool>,
}

impl Default for ZoonLayout {
    fn default() -> Self {
        Self {
            editor_width: Mutable::new(SizeClass::Full),
            editor_transition_ms: Mutable::new(0),
            output_class: Mutable::new(SizeClass::Full),
            output_height: Mutable::new(CssLength::default()),
            output_mounted: Mutable::new(false),
            output_revealed: Mutable::new(false),
            reveal_transition_ms: Mutable::new(0),
            clear_spacer: Mutable::new(false),
        }
    }
}

impl ZoonLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Places the editor and the rendering surface.
    pub fn view<E: Element, O: Element>(&self, editor: E, output: O) -> impl Element + use<E, O> {
        Column::new()
            .s(Width::fill())
            .s(Gap::new().y(10))
            .item(
                El::new()
                    .update_raw_el({
                        let editor_width = self.editor_width.clone();
                        let editor_transition_ms = self.editor_transition_ms.clone();
                        move |raw_el| {
                            raw_el
                                .style_signal(
                                    "width",
                                    editor_width
                                        .signal()
                                        .map(|class| format!("{}%", class.width_percent())),
                                )
                                .style_signal(
                                    "transition",
                                    editor_transition_ms
                                        .signal()
                                        .map(|ms| format!("width {ms}ms")),
                                )
                        }
                    })
                    .child(editor),
            )
            .item(self.output_panel(output))
            .item_signal(self.clear_spacer.signal().map_bool(
                || Some(El::new().update_raw_el(|raw_el| raw_el.style("clear", "both"))),
                || None,
            ))
    }

    fn output_panel<O: Element>(&self, output: O) -> impl Element + use<O> {
        El::new()
            .update_raw_el({
                let output_class = self.output_class.clone();
                let output_height = self.output_height.clone();
                let output_mounted = self.output_mounted.clone();
                let output_revealed = self.output_revealed.clone();
                let reveal_transition_ms = self.reveal_transition_ms.clone();
                move |raw_el| {
                    raw_el
                        .class_signal(
                            "col-md-12",
                            output_class.signal().map(|class| class == SizeClass::Full),
                        )
                        .class_signal(
                            "col-md-5",
                            output_class.signal().map(|class| class == SizeClass::FiveTwelfths),
                        )
                        .style_signal(
                            "display",
                            output_mounted.signal().map_bool(|| "block", || "none"),
                        )
                        .style_signal(
                            "width",
                            output_class
                                .signal()
                                .map(|class| format!("{}%", class.width_percent())),
                        )
                        .style_signal(
                            "height",
                            output_height.signal_cloned().map(|height| height.to_string()),
                        )
                        .style_signal("opacity", output_revealed.signal().map_bool(|| "1", || "0"))
                        .style_signal(
                            "transition",
                            reveal_transition_ms
                                .signal()
                                .map(|ms| format!("opacity {ms}ms")),
                        )
                }
            })
            .child(output)
    }

    pub fn output_revealed(&self) -> bool {
        self.output_revealed.get()
    }
}

impl LayoutContainer for ZoonLayout {
    fn mount_output(&self, layout: &LayoutState) {
        self.editor_width.set_neq(layout.editor_class);
        self.output_class.set_neq(layout.output_class);
        self.output_height.set_neq(layout.output_height.clone());
        self.output_mounted.set_neq(true);
    }

    fn append_clear_spacer(&self) {
        self.clear_spacer.set_neq(true);
    }

    fn start_transition(&self, transition: Transition) {
        match transition {
            Transition::EditorWidth { to, duration_ms, .. } => {
                self.editor_transition_ms.set_neq(duration_ms);
                self.editor_width.set_neq(to);
            }
            Transition::RevealOutput { duration_ms } => {
                self.reveal_transition_ms.set_neq(duration_ms);
                self.output_revealed.set_neq(true);
            }
        }
    }
}

// ------ IframeSandbox ------

/// `<iframe sandbox="allow-scripts">` fed through `srcdoc`. The frame gets an
/// opaque origin, so nothing in it can reach the playground.
#[derive(Clone, Default)]
pub struct IframeSandbox {
    dom: DomSlot,
    loads: Rc<LoadCounter>,
}

impl IframeSandbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn element(&self) -> impl Element + use<> {
        RawHtmlEl::new("iframe")
            .attr("sandbox", "allow-scripts")
            .attr("title", "Program output")
            .style("width", "100%")
            .style("height", "100%")
            .style("border", "none")
            .after_insert({
                let dom = self.dom.clone();
                move |element| {
                    dom.replace(Some(element));
                }
            })
            .after_remove({
                let dom = self.dom.clone();
                move |_| {
                    dom.take();
                }
            })
    }

    fn set_srcdoc(&self, html: &str) -> Result<(), SandboxError> {
        let dom = self.dom.borrow();
        let element = dom.as_ref().ok_or(SandboxError::NotMounted)?;
        element
            .set_attribute("srcdoc", html)
            .map_err(|error| SandboxError::Surface(format!("{error:?}")))
    }
}

impl RenderingSandbox for IframeSandbox {
    fn clear(&self) {
        if let Err(SandboxError::Surface(error)) = self.set_srcdoc("") {
            eprintln!("Failed to clear the output frame: {error}");
        }
    }

    fn load(&self, document: ExecutableDocument) -> Result<SandboxHandle, SandboxError> {
        self.set_srcdoc(document.as_str())?;
        Ok(self.loads.next())
    }
}
