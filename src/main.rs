use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> glib::ExitCode {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    concentration::ui::run()
}
