use moon::*;

async fn frontend() -> Frontend {
    Frontend::new()
        .title("ActiveCode")
        .body_content(r#"<div id="app" data-output-height="400px"></div>"#)
}

async fn up_msg_handler(_: UpMsgRequest<()>) {}

#[moon::main]
async fn main() -> std::io::Result<()> {
    start(frontend, up_msg_handler, |_| {}).await
}
