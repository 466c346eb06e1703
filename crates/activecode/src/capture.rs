//! Capture runtime.
//!
//! [`RUNTIME_SCRIPT`] is the Python embedded in every executable document: it
//! redirects `sys.stdout`/`sys.stderr` into the result panel, runs the program
//! in a fresh module scope and classifies failures.
//!
//! The rest of this module is the same state machine on the host side. Surfaces
//! that cannot run the embedded script (the CLI process sandbox) replay the
//! interpreter's [`RuntimeEvent`]s through a [`CaptureSession`], which yields
//! the [`ResultPresentation`] the browser would have shown.

use std::fmt;

use serde::{Deserialize, Serialize};

pub const RUNTIME_SCRIPT: &str = include_str!("capture/runtime.py");

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Rejected by the compiler before anything ran. The line comes from the
    /// error itself.
    Syntax,
    /// Raised while running. The line comes from the deepest traceback frame.
    Runtime,
}

/// A classified program failure.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    pub kind: FailureKind,
    pub class_name: String,
    pub message: String,
    #[serde(default)]
    pub line: Option<u32>,
}

impl Failure {
    pub fn syntax(class_name: impl Into<String>, message: impl Into<String>, line: u32) -> Self {
        Self {
            kind: FailureKind::Syntax,
            class_name: class_name.into(),
            message: message.into(),
            line: Some(line),
        }
    }

    pub fn runtime(
        class_name: impl Into<String>,
        message: impl Into<String>,
        line: Option<u32>,
    ) -> Self {
        Self {
            kind: FailureKind::Runtime,
            class_name: class_name.into(),
            message: message.into(),
            line,
        }
    }
}

/// `'<Class>': <message> at line <N>`. Without a line the text ends right
/// after the message.
impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}': {}", self.class_name, self.message)?;
        if let Some(line) = self.line {
            write!(f, " at line {line}")?;
        }
        Ok(())
    }
}

/// What an interpreter running a program reports, in order.
///
/// Wire form: `{"write": "..."}`, `"succeeded"`, `{"failed": {...}}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuntimeEvent {
    Write(String),
    Succeeded,
    Failed(Failure),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RuntimeState {
    Idle,
    Running,
    Succeeded,
    Failed,
}

impl RuntimeState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

/// The two mutually exclusive looks of the result panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VisualState {
    Output,
    Error,
}

impl VisualState {
    pub fn header(self) -> &'static str {
        match self {
            Self::Output => "Output",
            Self::Error => "Error",
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            Self::Output => "result-output",
            Self::Error => "result-error",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("cannot {action} while the capture runtime is {state:?}")]
    InvalidTransition {
        action: &'static str,
        state: RuntimeState,
    },
}

/// Accumulated program output.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CaptureLog {
    text: String,
    writes: usize,
}

impl CaptureLog {
    pub fn append(&mut self, data: &str) {
        self.text.push_str(data);
        self.writes += 1;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn write_count(&self) -> usize {
        self.writes
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResultPresentation {
    log: CaptureLog,
    visible: bool,
    attached: bool,
    state: Option<VisualState>,
    body_padding_px: Option<u32>,
}

impl ResultPresentation {
    /// Every write reveals the panel.
    fn write(&mut self, data: &str) {
        self.log.append(data);
        self.visible = true;
    }

    fn enter(&mut self, state: VisualState) {
        self.state = Some(state);
        self.attached = true;
    }

    pub fn log(&self) -> &CaptureLog {
        &self.log
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether the panel has been put into the document at all.
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn visual_state(&self) -> Option<VisualState> {
        self.state
    }

    pub fn header(&self) -> Option<&'static str> {
        self.state.map(VisualState::header)
    }

    /// Pads the document body by the panel's measured height so the fixed panel
    /// never covers trailing content. Replaces any earlier padding.
    pub fn apply_height_padding(&mut self, measured_height_px: u32) {
        self.body_padding_px = Some(measured_height_px);
    }

    pub fn body_padding_px(&self) -> Option<u32> {
        self.body_padding_px
    }
}

/// One program execution: `Idle -> Running -> {Succeeded, Failed}`.
#[derive(Clone, Debug)]
pub struct CaptureSession {
    state: RuntimeState,
    presentation: ResultPresentation,
    failure: Option<Failure>,
}

impl Default for CaptureSession {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureSession {
    pub fn new() -> Self {
        Self {
            state: RuntimeState::Idle,
            presentation: ResultPresentation::default(),
            failure: None,
        }
    }

    pub fn state(&self) -> RuntimeState {
        self.state
    }

    pub fn presentation(&self) -> &ResultPresentation {
        &self.presentation
    }

    pub fn presentation_mut(&mut self) -> &mut ResultPresentation {
        &mut self.presentation
    }

    pub fn failure(&self) -> Option<&Failure> {
        self.failure.as_ref()
    }

    pub fn into_parts(self) -> (ResultPresentation, Option<Failure>) {
        (self.presentation, self.failure)
    }

    pub fn start(&mut self) -> Result<(), CaptureError> {
        self.expect_state(RuntimeState::Idle, "start")?;
        self.state = RuntimeState::Running;
        Ok(())
    }

    pub fn write(&mut self, data: &str) -> Result<(), CaptureError> {
        self.expect_state(RuntimeState::Running, "write")?;
        self.presentation.write(data);
        Ok(())
    }

    pub fn succeed(&mut self) -> Result<(), CaptureError> {
        self.expect_state(RuntimeState::Running, "succeed")?;
        self.presentation.enter(VisualState::Output);
        self.state = RuntimeState::Succeeded;
        Ok(())
    }

    /// Logs the formatted failure like any printed line, then switches the
    /// panel to the error look. Earlier output stays in the log.
    pub fn fail(&mut self, failure: Failure) -> Result<(), CaptureError> {
        self.expect_state(RuntimeState::Running, "fail")?;
        self.presentation.write(&format!("{failure}\n"));
        self.presentation.enter(VisualState::Error);
        self.failure = Some(failure);
        self.state = RuntimeState::Failed;
        Ok(())
    }

    pub fn apply(&mut self, event: RuntimeEvent) -> Result<(), CaptureError> {
        match event {
            RuntimeEvent::Write(data) => self.write(&data),
            RuntimeEvent::Succeeded => self.succeed(),
            RuntimeEvent::Failed(failure) => self.fail(failure),
        }
    }

    fn expect_state(&self, expected: RuntimeState, action: &'static str) -> Result<(), CaptureError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(CaptureError::InvalidTransition {
                action,
                state: self.state,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running() -> CaptureSession {
        let mut session = CaptureSession::new();
        session.start().unwrap();
        session
    }

    #[test]
    fn failure_formatting() {
        let failure = Failure::runtime("ZeroDivisionError", "division by zero", Some(1));
        assert_eq!(
            failure.to_string(),
            "'ZeroDivisionError': division by zero at line 1"
        );

        let failure = Failure::syntax("SyntaxError", "invalid syntax", 3);
        assert_eq!(failure.to_string(), "'SyntaxError': invalid syntax at line 3");
    }

    #[test]
    fn missing_frame_drops_line_suffix() {
        let failure = Failure::runtime("KeyboardInterrupt", "", None);
        assert_eq!(failure.to_string(), "'KeyboardInterrupt': ");
        let failure = Failure::runtime("RuntimeError", "boom", None);
        assert!(failure.to_string().ends_with("boom"));
    }

    #[test]
    fn panel_hidden_until_first_write() {
        let mut session = running();
        assert!(!session.presentation().is_visible());
        session.write("hi").unwrap();
        assert!(session.presentation().is_visible());
    }

    #[test]
    fn success_without_output_stays_hidden() {
        let mut session = running();
        session.succeed().unwrap();
        let presentation = session.presentation();
        assert!(presentation.is_attached());
        assert!(!presentation.is_visible());
        assert_eq!(presentation.visual_state(), Some(VisualState::Output));
    }

    #[test]
    fn success_shows_output_header() {
        let mut session = running();
        session.apply(RuntimeEvent::Write("hi".to_owned())).unwrap();
        session.apply(RuntimeEvent::Write("\n".to_owned())).unwrap();
        session.apply(RuntimeEvent::Succeeded).unwrap();
        assert_eq!(session.state(), RuntimeState::Succeeded);
        let presentation = session.presentation();
        assert_eq!(presentation.header(), Some("Output"));
        assert_eq!(presentation.visual_state(), Some(VisualState::Output));
        assert_eq!(presentation.log().text(), "hi\n");
        assert!(session.failure().is_none());
    }

    #[test]
    fn failure_keeps_partial_output() {
        let mut session = running();
        session.write("before\n").unwrap();
        session
            .fail(Failure::runtime("NameError", "name 'y' is not defined", Some(2)))
            .unwrap();
        assert_eq!(session.state(), RuntimeState::Failed);
        let presentation = session.presentation();
        assert_eq!(presentation.header(), Some("Error"));
        assert_eq!(presentation.visual_state(), Some(VisualState::Error));
        assert_eq!(
            presentation.log().text(),
            "before\n'NameError': name 'y' is not defined at line 2\n"
        );
        assert!(presentation.is_visible());
    }

    #[test]
    fn terminal_states_reject_further_events() {
        let mut session = running();
        session.succeed().unwrap();
        assert!(session.write("late").is_err());
        assert!(session.succeed().is_err());
        assert!(
            session
                .fail(Failure::runtime("ValueError", "x", None))
                .is_err()
        );
        assert_eq!(session.presentation().visual_state(), Some(VisualState::Output));
    }

    #[test]
    fn events_before_start_are_rejected() {
        let mut session = CaptureSession::new();
        let error = session.write("x").unwrap_err();
        assert!(matches!(
            error,
            CaptureError::InvalidTransition {
                state: RuntimeState::Idle,
                ..
            }
        ));
        session.start().unwrap();
        assert!(session.start().is_err());
    }

    #[test]
    fn height_padding_is_idempotent() {
        let mut session = running();
        session.write("hi\n").unwrap();
        session.succeed().unwrap();
        let presentation = session.presentation_mut();
        presentation.apply_height_padding(120);
        presentation.apply_height_padding(120);
        assert_eq!(presentation.body_padding_px(), Some(120));
    }

    #[test]
    fn wire_format() {
        let event: RuntimeEvent = serde_json::from_str(r#"{"write": "hi\n"}"#).unwrap();
        assert_eq!(event, RuntimeEvent::Write("hi\n".to_owned()));

        let event: RuntimeEvent = serde_json::from_str(r#""succeeded""#).unwrap();
        assert_eq!(event, RuntimeEvent::Succeeded);

        let event: RuntimeEvent = serde_json::from_str(
            r#"{"failed": {"kind": "syntax", "class_name": "SyntaxError", "message": "invalid syntax", "line": 2}}"#,
        )
        .unwrap();
        assert_eq!(
            event,
            RuntimeEvent::Failed(Failure::syntax("SyntaxError", "invalid syntax", 2))
        );

        let event: RuntimeEvent = serde_json::from_str(
            r#"{"failed": {"kind": "runtime", "class_name": "SystemExit", "message": "", "line": null}}"#,
        )
        .unwrap();
        assert_eq!(event, RuntimeEvent::Failed(Failure::runtime("SystemExit", "", None)));
    }

    #[test]
    fn runtime_script_mirrors_the_format() {
        assert!(RUNTIME_SCRIPT.contains(r#"f"'{error_class}': {message} at line {line}""#));
        assert!(RUNTIME_SCRIPT.contains("sys.stderr = sys.stdout = CaptureLog()"));
        assert!(RUNTIME_SCRIPT.contains(VisualState::Output.css_class()));
        assert!(RUNTIME_SCRIPT.contains(VisualState::Error.css_class()));
        assert!(!RUNTIME_SCRIPT.contains("</script"));
    }
}
