use std::cell::RefCell;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, Command, Stdio};

use crate::capture::{CaptureSession, Failure, ResultPresentation, RuntimeEvent};
use crate::document::ExecutableDocument;
use crate::sandbox::{LoadCounter, RenderingSandbox, SandboxError, SandboxHandle};

use super::terminal::TerminalSurface;

pub const DEFAULT_INTERPRETER: &str = "python3";

/// Class reported when the interpreter dies without finishing the program.
pub const EXIT_FAILURE_CLASS: &str = "ProcessExit";

/// Driver run by the child interpreter: decodes the program literal from stdin,
/// executes it and reports [`RuntimeEvent`]s as JSON lines on a private copy
/// of its stdout pipe.
pub const DRIVER_SCRIPT: &str = include_str!("driver.py");

/// Runs each loaded document's program in a separate interpreter process.
///
/// The only thing handed to the child is the document's escaped payload, on
/// stdin. Its reports are replayed into a [`CaptureSession`] and drawn on the
/// terminal surface; [`RenderingSandbox::load`] returns once the program
/// finished, without any word on how it went.
pub struct ProcessSandbox<W: Write> {
    interpreter: String,
    surface: RefCell<TerminalSurface<W>>,
    loads: LoadCounter,
    last_presentation: RefCell<Option<ResultPresentation>>,
}

impl<W: Write> ProcessSandbox<W> {
    pub fn new(interpreter: impl Into<String>, surface: TerminalSurface<W>) -> Self {
        Self {
            interpreter: interpreter.into(),
            surface: RefCell::new(surface),
            loads: LoadCounter::default(),
            last_presentation: RefCell::new(None),
        }
    }

    /// What the surface currently shows.
    pub fn last_presentation(&self) -> Option<ResultPresentation> {
        self.last_presentation.borrow().clone()
    }

    pub fn into_surface(self) -> TerminalSurface<W> {
        self.surface.into_inner()
    }

    fn execute(&self, document: &ExecutableDocument) -> Result<CaptureSession, SandboxError> {
        let mut child = Command::new(&self.interpreter)
            .arg("-c")
            .arg(DRIVER_SCRIPT)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| SandboxError::Spawn {
                interpreter: self.interpreter.clone(),
                source,
            })?;

        let mut session = CaptureSession::new();
        if let Err(error) = replay(&mut child, document, &mut session) {
            if let Err(kill_error) = child.kill() {
                log::debug!("interpreter already gone: {kill_error}");
            }
            if let Err(wait_error) = child.wait() {
                log::warn!("failed to reap interpreter: {wait_error}");
            }
            return Err(error);
        }

        let status = child.wait()?;
        if !session.state().is_terminal() {
            log::warn!("interpreter exited ({status}) before the program finished");
            session.fail(Failure::runtime(
                EXIT_FAILURE_CLASS,
                format!("interpreter exited with {status}"),
                None,
            ))?;
        }
        Ok(session)
    }
}

/// Hands the payload to the driver and applies its events until the channel
/// closes.
fn replay(
    child: &mut Child,
    document: &ExecutableDocument,
    session: &mut CaptureSession,
) -> Result<(), SandboxError> {
    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(document.payload().literal().as_bytes())?;
    }

    session.start()?;
    if let Some(stdout) = child.stdout.take() {
        for line in BufReader::new(stdout).lines() {
            let line = line?;
            if line.is_empty() {
                continue;
            }
            let event = serde_json::from_str::<RuntimeEvent>(&line)
                .map_err(|source| SandboxError::Event { line, source })?;
            session.apply(event)?;
        }
    }
    Ok(())
}

impl<W: Write> RenderingSandbox for ProcessSandbox<W> {
    fn clear(&self) {
        self.last_presentation.borrow_mut().take();
    }

    fn load(&self, document: ExecutableDocument) -> Result<SandboxHandle, SandboxError> {
        let handle = self.loads.next();
        let source = document.payload().decode().map_err(SandboxError::Payload)?;
        let session = self.execute(&document)?;
        let (mut presentation, failure) = session.into_parts();
        let height = self
            .surface
            .borrow_mut()
            .render(&presentation, failure.as_ref(), &source)?;
        presentation.apply_height_padding(height);
        self.last_presentation.replace(Some(presentation));
        Ok(handle)
    }
}
