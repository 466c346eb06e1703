//! `activecode run`: drive the widget pipeline with a process sandbox.

use std::path::Path;

use activecode::ActiveCode;
use activecode::ActiveCodeConfig;
use activecode::platform::cli::{
    FileEditor, LoggingSave, ProcessSandbox, TerminalLayout, TerminalSurface,
};
use anyhow::{Context, Result};

pub fn run(config: &ActiveCodeConfig, program: &Path, python: &str) -> Result<()> {
    let initial_code = std::fs::read_to_string(program)
        .with_context(|| format!("failed to read program {}", program.display()))?;
    let label = program
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| program.display().to_string());

    let widget = ActiveCode::new(
        config,
        &initial_code,
        FileEditor::new(program),
        LoggingSave::default(),
        TerminalLayout::default(),
        ProcessSandbox::new(python, TerminalSurface::new(std::io::stdout(), label)),
    );

    let handle = futures::executor::block_on(widget.run())
        .with_context(|| format!("failed to run {}", program.display()))?;
    log::info!("finished sandbox generation {}", handle.generation());
    Ok(())
}
