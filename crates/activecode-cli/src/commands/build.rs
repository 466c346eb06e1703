//! `activecode build`: write the executable document for a program.

use std::io::Write;
use std::path::Path;

use activecode::{ActiveCodeConfig, DocumentBuilder};
use anyhow::{Context, Result};

pub fn run(config: &ActiveCodeConfig, program: &Path, output: Option<&Path>) -> Result<()> {
    let program_text = std::fs::read_to_string(program)
        .with_context(|| format!("failed to read program {}", program.display()))?;

    let document = DocumentBuilder::new(config.runtime.clone())
        .with_interpreter_variant(config.python3_interpreter.clone())
        .build(&program_text, &config.output_height());

    match output {
        Some(path) => {
            std::fs::write(path, document.as_str())
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Document written to {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(document.as_str().as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}
