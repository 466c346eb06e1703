//! Sandboxed execution/report pipeline of the ActiveCode render widget.
//!
//! A run reads the program from the editor, builds a self-contained
//! [`document::ExecutableDocument`] around it and loads that into an isolated
//! [`sandbox::RenderingSandbox`]. The [`capture`] runtime inside the document
//! prints the program's output, or a classified error, into the result panel.

pub mod capture;
pub mod config;
pub mod controller;
pub mod document;
pub mod escape;
pub mod platform;
pub mod sandbox;

pub use capture::{CaptureSession, Failure, FailureKind, ResultPresentation, RuntimeEvent, VisualState};
pub use config::{ActiveCodeConfig, ConfigError, CssLength};
pub use controller::{
    ActiveCode, ActiveCodeError, Editor, LayoutContainer, LayoutState, SaveSignal, SaveWorkflow,
    SizeClass, Transition,
};
pub use document::{DocumentBuilder, ExecutableDocument, RuntimeAssets};
pub use sandbox::{RenderingSandbox, SandboxError, SandboxHandle};

#[cfg(feature = "browser")]
pub use zoon;
