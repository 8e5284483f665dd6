use anyhow::Result;
use tracing_subscriber::EnvFilter;

use confab::generation::EchoAdapter;
use confab::session::ChatSession;
use confab::ui::ChatApp;

fn main() -> Result<()> {
    // Logs go to stderr so they can be redirected away from the UI;
    // silent unless RUST_LOG asks for output.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let session = ChatSession::new(Box::new(EchoAdapter::new()));

    let mut terminal = ratatui::init();
    let result = ChatApp::new(session).run(&mut terminal);
    ratatui::restore();
    result
}
