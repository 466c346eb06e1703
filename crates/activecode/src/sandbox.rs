//! The isolated rendering surface.

use std::cell::Cell;
use std::io;

use crate::document::ExecutableDocument;

/// Identifies one load of a sandbox. Later loads compare greater.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SandboxHandle(u64);

impl SandboxHandle {
    pub fn generation(self) -> u64 {
        self.0
    }
}

/// Hands out increasing [`SandboxHandle`]s.
#[derive(Debug, Default)]
pub struct LoadCounter(Cell<u64>);

impl LoadCounter {
    pub fn next(&self) -> SandboxHandle {
        let generation = self.0.get() + 1;
        self.0.set(generation);
        SandboxHandle(generation)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SandboxError {
    #[error("the rendering surface is not mounted")]
    NotMounted,
    #[error("failed to start interpreter `{interpreter}`")]
    Spawn {
        interpreter: String,
        #[source]
        source: io::Error,
    },
    #[error("sandbox i/o failed")]
    Io(#[from] io::Error),
    #[error("malformed runtime event `{line}`")]
    Event {
        line: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("embedded program is not a valid string literal")]
    Payload(#[source] serde_json::Error),
    #[error("the rendering surface rejected the document: {0}")]
    Surface(String),
    #[error(transparent)]
    Capture(#[from] crate::capture::CaptureError),
}

/// An execution context with no shared state with its host.
///
/// Loading a document replaces whatever the surface showed before and starts
/// the embedded capture runtime. Any execution still in flight in the old
/// content is abandoned. Nothing about the program's outcome flows back: the
/// surface only shows it.
pub trait RenderingSandbox {
    /// Empties the surface before a new run.
    fn clear(&self);

    fn load(&self, document: ExecutableDocument) -> Result<SandboxHandle, SandboxError>;
}
