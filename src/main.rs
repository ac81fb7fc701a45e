use std::error::Error;
use std::sync::Arc;

use clap::Parser;
use log::info;
use plotserve::{server, Config, ElapsedTimer, Session};
use simple_logger::SimpleLogger;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .env()
        .init()?;

    let config = Config::parse();
    config.validate()?;

    let session = Arc::new(Session::with_tick_period(
        config.renderer(),
        config.tick_period(),
    )?);

    let ticking = session.clone();
    let mut timer = ElapsedTimer::start(session.tick_period(), move || ticking.tick());

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("serving on http://{}", listener.local_addr()?);

    axum::serve(listener, server::router(session))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down");
        })
        .await?;

    timer.stop();
    Ok(())
}
