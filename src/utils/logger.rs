use tracing_subscriber::fmt::format::{Compact, Format, Json, JsonFields};
use tracing_subscriber::fmt::Layer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

fn env_filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive))
}

/// Plain message lines without source locations.
fn base_layer() -> Layer<Registry> {
    tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
}

fn compact_layer() -> Layer<Registry, tracing_subscriber::fmt::format::DefaultFields, Format<Compact>> {
    base_layer().compact()
}

fn json_layer() -> Layer<Registry, JsonFields, Format<Json>> {
    base_layer().json()
}

pub fn init_cli_logger(verbose: bool) {
    let filter = if verbose {
        env_filter("legacy_order_xml=debug,info")
    } else {
        env_filter("legacy_order_xml=info")
    };

    tracing_subscriber::registry()
        .with(compact_layer())
        .with(filter)
        .init();
}

/// JSON lines on stdout, for runs collected by a log shipper.
pub fn init_json_logger(level: &str) {
    tracing_subscriber::registry()
        .with(json_layer())
        .with(env_filter(&format!("legacy_order_xml={}", level)))
        .init();
}
