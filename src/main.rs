use docchat::config::Config;

fn main() {
    let config = Config::from_env();
    docchat::logging::init(&config.log_filter);
    tracing::info!(backend = %config.backend_url, "starting docchat");
    dioxus::launch(docchat::ui::App);
}
