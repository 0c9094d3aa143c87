use berlin::engine::Echo;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use vercel_runtime::{run, Body, Error, Request, Response};

#[tokio::main]
async fn main() -> Result<(), Error> {
    // The platform collects stdout per invocation.
    let local_layer = tracing_subscriber::fmt::layer()
        .compact()
        .without_time()
        .with_ansi(false)
        .with_target(false);

    let subscriber = tracing_subscriber::registry::Registry::default()
        .with(LevelFilter::INFO)
        .with(local_layer);

    tracing::subscriber::set_global_default(subscriber)?;

    run(handler).await
}

pub async fn handler(req: Request) -> Result<Response<Body>, Error> {
    berlin_hosted::handle(&Echo, req).await
}
