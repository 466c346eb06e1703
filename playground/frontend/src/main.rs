use std::rc::Rc;

use activecode::platform::browser::{
    IframeSandbox, LAST_PROGRAM_STORAGE_KEY, LocalStorageSave, TextAreaEditor, ZoonLayout,
};
use activecode::zoon::{eprintln, println, *};
use activecode::{ActiveCode, ActiveCodeConfig, CssLength};

const APP_ELEMENT_ID: &str = "app";

const DEFAULT_PROGRAM: &str = "for i in range(3):\n    print(f\"Hello #{i}\")\n";

type Widget = ActiveCode<TextAreaEditor, LocalStorageSave, ZoonLayout, IframeSandbox>;

fn main() {
    start_app(APP_ELEMENT_ID, Playground::new);
}

#[derive(Clone)]
struct Playground {
    widget: Rc<Widget>,
}

impl Playground {
    fn new() -> impl Element {
        let config = config_from_mount_element();
        let initial_code = LocalStorageSave::stored_program(LAST_PROGRAM_STORAGE_KEY)
            .unwrap_or_else(|| DEFAULT_PROGRAM.to_owned());

        let editor = TextAreaEditor::new();
        let widget = ActiveCode::new(
            &config,
            &initial_code,
            editor.clone(),
            LocalStorageSave::new(editor),
            ZoonLayout::new(),
            IframeSandbox::new(),
        );
        Self {
            widget: Rc::new(widget),
        }
        .root()
    }

    fn root(&self) -> impl Element + use<> {
        Column::new()
            .s(Width::fill())
            .s(Padding::all(12))
            .s(Gap::new().y(10))
            .update_raw_el({
                let this = self.clone();
                move |raw_el| {
                    raw_el.global_event_handler_with_options(
                        EventOptions::new().preventable().parents_first(),
                        move |event: events::KeyDown| {
                            if event.repeat() {
                                return;
                            }
                            if event.shift_key() && event.key() == "Enter" {
                                event.prevent_default();
                                this.run();
                            }
                        },
                    )
                }
            })
            .item(self.render_button())
            .item(self.widget.container().view(
                self.widget.editor().element(),
                self.widget.sandbox().element(),
            ))
    }

    fn render_button(&self) -> impl Element + use<> {
        let hovered = Mutable::new(false);
        Button::new()
            .s(Padding::new().x(14).y(7))
            .s(RoundedCorners::all(22))
            .s(Font::new().color(color!("#052039")).weight(FontWeight::SemiBold))
            .s(Background::new().color_signal(hovered.signal().map_bool(
                || color!("rgba(140, 196, 255, 0.9)"),
                || color!("rgba(108, 162, 255, 0.75)"),
            )))
            .label(
                Row::new()
                    .s(Gap::new().x(6))
                    .item(El::new().s(Font::new().size(14).no_wrap()).child("Render"))
                    .item(
                        El::new()
                            .s(Font::new().size(13).color(color!("rgba(5, 32, 57, 0.78)")).no_wrap())
                            .child("Shift + Enter"),
                    ),
            )
            .on_hovered_change(move |is_hovered| hovered.set(is_hovered))
            .on_press({
                let this = self.clone();
                move || this.run()
            })
    }

    fn run(&self) {
        let widget = self.widget.clone();
        Task::start(async move {
            match widget.run().await {
                Ok(handle) => println!("Program loaded (generation {})", handle.generation()),
                Err(error) => eprintln!("Failed to render program: {error}"),
            }
        });
    }
}

/// Widget options come from `data-*` attributes on the mount element.
fn config_from_mount_element() -> ActiveCodeConfig {
    let mut config = ActiveCodeConfig::default();
    let Some(app) = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.get_element_by_id(APP_ELEMENT_ID))
    else {
        return config;
    };
    if let Some(height) = app.get_attribute("data-output-height") {
        match height.parse::<CssLength>() {
            Ok(height) => config.output_height = Some(height),
            Err(error) => eprintln!("Ignoring data-output-height: {error}"),
        }
    }
    config.python3_interpreter = app.get_attribute("data-python3-interpreter");
    config
}
