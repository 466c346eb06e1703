//! Program text survives embedding into a document unchanged, whatever it contains.

use activecode::escape::decode_script_string_literal;
use activecode::{CssLength, DocumentBuilder};

const PROGRAMS: &[&str] = &[
    "",
    "print(\"hi\")",
    "s = 'single' + \"double\" + '''triple'''",
    "path = 'C:\\\\Users\\\\new'\nprint(path, '\\n')",
    "print('</script><script>alert(1)</script>')",
    "html = '<!-- <b>bold</b> & <i>it</i> -->'",
    "template = `${document.title}` + '${x}' + '{{ program }}' + '%(divid)s' + f'{1 + 1}'",
    "program = 'shadowing the binding'\nrun_program(program)",
    "tabs\tand\rcarriage\u{0}nul\u{1b}escape",
    "unicode = 'héllo wörld ✓ 𝄞 \u{2028}\u{2029}'",
    "end_with_backslash = 1 \\",
];

/// Pulls the literal back out of the document text the way an interpreter
/// reading the script would find it.
fn embedded_literal(html: &str) -> &str {
    let start = html.find("\nprogram = ").expect("program binding") + "\nprogram = ".len();
    let end = start + html[start..].find('\n').expect("end of binding line");
    &html[start..end]
}

#[test]
fn round_trip_through_the_document() {
    let builder = DocumentBuilder::default();
    for program in PROGRAMS {
        let document = builder.build(program, &CssLength::default());
        let literal = embedded_literal(document.as_str());
        assert_eq!(literal, document.payload().literal());
        assert_eq!(&decode_script_string_literal(literal).unwrap(), program);
    }
}

#[test]
fn payload_never_leaves_the_script_element() {
    let builder = DocumentBuilder::default();
    for program in PROGRAMS {
        let document = builder.build(program, &CssLength::default());
        let literal = document.payload().literal();
        assert!(!literal.contains('<'), "{literal}");
        assert!(!literal.contains('\n'), "{literal}");
        assert_eq!(document.as_str().matches("</script>").count(), 4);
    }
}

#[test]
fn height_hint_does_not_touch_the_payload() {
    let builder = DocumentBuilder::default();
    let low = builder.build("print(1)", &"100px".parse().unwrap());
    let high = builder.build("print(1)", &"90vh".parse().unwrap());
    assert_eq!(low.payload(), high.payload());
    assert_ne!(low.style(), high.style());
}
