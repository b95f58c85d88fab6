use obsidian_launcher::config::Settings;
use obsidian_launcher::plugin::Plugin;
use tracing_subscriber::EnvFilter;

fn main() {
    // stdout belongs to the launcher protocol; logs go to stderr.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let settings = Settings::from_env();
    let mut plugin = Plugin::from_settings(settings);

    let request = std::env::args().nth(1);
    let response = plugin.handle_raw(request.as_deref());

    match serde_json::to_string(&response) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            tracing::error!("could not serialize response: {e}");
            println!(r#"{{"result": []}}"#);
        }
    }
}
