//! Render/reveal controller.
//!
//! [`ActiveCode`] owns no UI itself. It reads the program from an [`Editor`],
//! lets the [`SaveWorkflow`] record the run, asks the [`LayoutContainer`] for
//! the reveal transitions and hands a freshly built document to the
//! [`RenderingSandbox`]. What the program does after that is only visible
//! inside the sandbox.

use std::cell::{Cell, RefCell};
use std::future::Future;

use crate::config::{ActiveCodeConfig, CssLength};
use crate::document::DocumentBuilder;
use crate::sandbox::{RenderingSandbox, SandboxError, SandboxHandle};

pub const EDITOR_TRANSITION_MS: u32 = 500;
pub const REVEAL_TRANSITION_MS: u32 = 700;

/// Bootstrap-style grid column classes used by the widget.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SizeClass {
    Full,
    Half,
    FiveTwelfths,
}

impl SizeClass {
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Full => "col-md-12",
            Self::Half => "col-md-6",
            Self::FiveTwelfths => "col-md-5",
        }
    }

    pub fn width_percent(self) -> f64 {
        match self {
            Self::Full => 100.0,
            Self::Half => 50.0,
            Self::FiveTwelfths => 500.0 / 12.0,
        }
    }
}

/// Cosmetic layout changes. Started, never awaited.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    EditorWidth {
        from: SizeClass,
        to: SizeClass,
        duration_ms: u32,
    },
    RevealOutput {
        duration_ms: u32,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayoutState {
    /// Editor and result stacked (`true`) or side by side.
    pub align_vertical: bool,
    pub editor_class: SizeClass,
    pub output_class: SizeClass,
    pub output_height: CssLength,
}

/// Value passed to and returned by the save/scrub workflow.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SaveSignal {
    #[default]
    Save,
    Skip,
}

pub trait Editor {
    fn value(&self) -> String;

    fn set_value(&self, value: &str);
}

pub trait SaveWorkflow {
    fn manage_scrubber(&self, signal: SaveSignal) -> impl Future<Output = SaveSignal>;
}

pub trait LayoutContainer {
    /// Puts the rendering surface into the container.
    fn mount_output(&self, layout: &LayoutState);

    /// Adds the element that makes the container resize around its floated
    /// children.
    fn append_clear_spacer(&self);

    fn start_transition(&self, transition: Transition);
}

#[derive(Debug, thiserror::Error)]
pub enum ActiveCodeError {
    #[error(transparent)]
    Sandbox(#[from] SandboxError),
}

pub struct ActiveCode<E, S, C, B> {
    editor: E,
    save: S,
    container: C,
    sandbox: B,
    builder: DocumentBuilder,
    layout: RefCell<LayoutState>,
    save_signal: Cell<SaveSignal>,
    run_count: Cell<u64>,
}

impl<E, S, C, B> ActiveCode<E, S, C, B>
where
    E: Editor,
    S: SaveWorkflow,
    C: LayoutContainer,
    B: RenderingSandbox,
{
    /// Seeds the editor with `initial_code` and mounts the output surface.
    pub fn new(
        config: &ActiveCodeConfig,
        initial_code: &str,
        editor: E,
        save: S,
        container: C,
        sandbox: B,
    ) -> Self {
        let builder = DocumentBuilder::new(config.runtime.clone())
            .with_interpreter_variant(config.python3_interpreter.clone());
        let active_code = Self {
            editor,
            save,
            container,
            sandbox,
            builder,
            layout: RefCell::new(Self::create_output(config)),
            save_signal: Cell::new(SaveSignal::default()),
            run_count: Cell::new(0),
        };
        active_code.container.mount_output(&active_code.layout.borrow());
        active_code.container.append_clear_spacer();
        active_code.editor.set_value(initial_code);
        active_code
    }

    fn create_output(config: &ActiveCodeConfig) -> LayoutState {
        if config.align_vertical == Some(false) {
            log::debug!("ignoring horizontal alignment request, output is always stacked");
        }
        let align_vertical = true;
        LayoutState {
            align_vertical,
            editor_class: SizeClass::Full,
            output_class: if align_vertical {
                SizeClass::Full
            } else {
                SizeClass::FiveTwelfths
            },
            output_height: config.output_height(),
        }
    }

    pub async fn run(&self) -> Result<SandboxHandle, ActiveCodeError> {
        let program_text = self.editor.value();
        let save_signal = self.save.manage_scrubber(SaveSignal::Save).await;
        self.save_signal.set(save_signal);
        self.sandbox.clear();

        let output_height = {
            let mut layout = self.layout.borrow_mut();
            if !layout.align_vertical {
                let from = layout.editor_class;
                layout.editor_class = SizeClass::Half;
                self.container.start_transition(Transition::EditorWidth {
                    from,
                    to: SizeClass::Half,
                    duration_ms: EDITOR_TRANSITION_MS,
                });
            }
            layout.output_height.clone()
        };
        self.container.start_transition(Transition::RevealOutput {
            duration_ms: REVEAL_TRANSITION_MS,
        });

        let document = self.builder.build(&program_text, &output_height);
        let handle = self.sandbox.load(document)?;
        self.run_count.set(self.run_count.get() + 1);
        log::info!(
            "run {} loaded into sandbox (generation {})",
            self.run_count.get(),
            handle.generation()
        );
        Ok(handle)
    }

    pub fn layout(&self) -> LayoutState {
        self.layout.borrow().clone()
    }

    pub fn interpreter_variant(&self) -> Option<&str> {
        self.builder.interpreter_variant()
    }

    /// What the save workflow answered on the latest run.
    pub fn save_signal(&self) -> SaveSignal {
        self.save_signal.get()
    }

    pub fn run_count(&self) -> u64 {
        self.run_count.get()
    }

    pub fn editor(&self) -> &E {
        &self.editor
    }

    pub fn save_workflow(&self) -> &S {
        &self.save
    }

    pub fn container(&self) -> &C {
        &self.container
    }

    pub fn sandbox(&self) -> &B {
        &self.sandbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ExecutableDocument;
    use crate::sandbox::LoadCounter;
    use std::future::ready;

    #[derive(Default)]
    struct Recorder {
        transitions: RefCell<Vec<Transition>>,
        loads: LoadCounter,
        text: RefCell<String>,
    }

    impl Editor for &Recorder {
        fn value(&self) -> String {
            self.text.borrow().clone()
        }

        fn set_value(&self, value: &str) {
            *self.text.borrow_mut() = value.to_owned();
        }
    }

    impl SaveWorkflow for &Recorder {
        fn manage_scrubber(&self, signal: SaveSignal) -> impl Future<Output = SaveSignal> {
            ready(signal)
        }
    }

    impl LayoutContainer for &Recorder {
        fn mount_output(&self, _layout: &LayoutState) {}

        fn append_clear_spacer(&self) {}

        fn start_transition(&self, transition: Transition) {
            self.transitions.borrow_mut().push(transition);
        }
    }

    impl RenderingSandbox for &Recorder {
        fn clear(&self) {}

        fn load(&self, _document: ExecutableDocument) -> Result<SandboxHandle, SandboxError> {
            Ok(self.loads.next())
        }
    }

    #[test]
    fn horizontal_layout_halves_the_editor() {
        let recorder = Recorder::default();
        let active_code = ActiveCode::new(
            &ActiveCodeConfig::default(),
            "print(1)",
            &recorder,
            &recorder,
            &recorder,
            &recorder,
        );
        active_code.layout.borrow_mut().align_vertical = false;

        futures::executor::block_on(active_code.run()).unwrap();

        assert_eq!(active_code.layout().editor_class, SizeClass::Half);
        let transitions = recorder.transitions.borrow();
        assert!(transitions.contains(&Transition::EditorWidth {
            from: SizeClass::Full,
            to: SizeClass::Half,
            duration_ms: EDITOR_TRANSITION_MS,
        }));
        assert!(transitions.contains(&Transition::RevealOutput {
            duration_ms: REVEAL_TRANSITION_MS,
        }));
    }

    #[test]
    fn size_classes() {
        assert_eq!(SizeClass::Full.css_class(), "col-md-12");
        assert_eq!(SizeClass::Half.width_percent(), 50.0);
        assert!(SizeClass::FiveTwelfths.width_percent() < SizeClass::Half.width_percent());
    }
}
