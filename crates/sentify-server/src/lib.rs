//! HTTP surface for Sentify.
//!
//! Routes live under `/api` and run the synchronous core on tokio's
//! blocking pool. Validation failures map to 422, an unreachable store to
//! 503; reads never fail outright and instead carry an `error` field.

mod error;
mod routes;

pub use error::{ServerError, error_body, status_for};
pub use routes::{ListingBody, SummaryBody};

use log::info;
use rocket::{Build, Rocket};
use sentify_config::ServerConfig;
use sentify_core::Sentify;

/// Assemble the rocket instance with routes, catchers, and bind settings.
pub fn build_rocket(sentify: Sentify, config: &ServerConfig) -> Rocket<Build> {
    let figment = rocket::Config::figment()
        .merge(("address", config.address.as_str()))
        .merge(("port", config.port));
    rocket::custom(figment)
        .manage(sentify)
        .mount("/api", routes::routes())
        .register("/", routes::catchers())
}

/// Bind and serve until shutdown.
pub async fn serve(sentify: Sentify, config: &ServerConfig) -> Result<(), ServerError> {
    info!(
        "starting sentify server (address={}, port={})",
        config.address, config.port
    );
    build_rocket(sentify, config).launch().await?;
    info!("sentify server stopped");
    Ok(())
}
