use berlin::engine::Echo;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;

#[tokio::main]
async fn main() {
    berlin_serve::config::load();

    // Stdout carries turn responses, so diagnostics go to stderr.
    let local_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_target(false)
        .with_writer(std::io::stderr);

    let subscriber = tracing_subscriber::registry::Registry::default()
        .with(LevelFilter::INFO)
        .with(local_layer);

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("setting global default failed: {}", e);
    }

    // Plays back every turn it receives. Swap in a real engine here.
    berlin_serve::serve(Echo).await;
}
