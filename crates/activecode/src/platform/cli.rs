//! Collaborators for running the widget pipeline from a terminal.

mod process_sandbox;
mod terminal;

pub use process_sandbox::{DEFAULT_INTERPRETER, DRIVER_SCRIPT, EXIT_FAILURE_CLASS, ProcessSandbox};
pub use terminal::TerminalSurface;

use std::cell::RefCell;
use std::fs;
use std::future::{Future, ready};
use std::path::{Path, PathBuf};

use crate::controller::{Editor, LayoutContainer, LayoutState, SaveSignal, SaveWorkflow, Transition};

/// Edits a program file. Every read goes back to the disk.
pub struct FileEditor {
    path: PathBuf,
}

impl FileEditor {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Editor for FileEditor {
    fn value(&self) -> String {
        fs::read_to_string(&self.path).unwrap_or_else(|error| {
            log::error!("failed to read {}: {error}", self.path.display());
            String::new()
        })
    }

    fn set_value(&self, value: &str) {
        if fs::read_to_string(&self.path).is_ok_and(|current| current == value) {
            return;
        }
        if let Err(error) = fs::write(&self.path, value) {
            log::error!("failed to write {}: {error}", self.path.display());
        }
    }
}

/// Answers every save request as given and remembers what was asked.
#[derive(Default)]
pub struct LoggingSave {
    requests: RefCell<Vec<SaveSignal>>,
}

impl LoggingSave {
    pub fn requests(&self) -> Vec<SaveSignal> {
        self.requests.borrow().clone()
    }
}

impl SaveWorkflow for LoggingSave {
    fn manage_scrubber(&self, signal: SaveSignal) -> impl Future<Output = SaveSignal> {
        log::debug!("save requested: {signal:?}");
        self.requests.borrow_mut().push(signal);
        ready(signal)
    }
}

/// A terminal has no layout to animate; transitions are only logged.
#[derive(Default)]
pub struct TerminalLayout {
    transitions: RefCell<Vec<Transition>>,
}

impl TerminalLayout {
    pub fn transitions(&self) -> Vec<Transition> {
        self.transitions.borrow().clone()
    }
}

impl LayoutContainer for TerminalLayout {
    fn mount_output(&self, layout: &LayoutState) {
        log::debug!(
            "output mounted: {} with height {}",
            layout.output_class.css_class(),
            layout.output_height
        );
    }

    fn append_clear_spacer(&self) {}

    fn start_transition(&self, transition: Transition) {
        log::trace!("transition: {transition:?}");
        self.transitions.borrow_mut().push(transition);
    }
}
