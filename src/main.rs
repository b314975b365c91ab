mod app;

use app::App;
use iced::Application;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> iced::Result {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "morse_watcher=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("Morse Watcher");
    println!("-------------");
    println!("Watch the light and read the decoded message as it locks on.");
    println!("Edit a timing field and press Enter, or click Reset, to restart playback.");
    println!("CLI: cargo run --bin morse-watcher-cli -- --help");
    println!();
    info!("opening window");
    App::run(iced::Settings::default())
}
