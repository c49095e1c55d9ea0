pub mod handlers;
pub mod router;
pub mod state;
pub mod uispec;

use crate::{
    conf::settings,
    pkg::internal::adaptors::MIGRATOR,
    prelude::{OrStandardError, Result},
};
use router::routes;
use state::AppState;

pub async fn listen() -> Result<()> {
    let state = AppState::new().await?;
    MIGRATOR.run(&*state.db_pool).await.or_err("ERR-DB-000")?;
    tracing::debug!("schema is up to date");

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", settings.listen_port))
        .await
        .or_err("ERR-CONF-001")?;
    tracing::info!("Listening at port {}", settings.listen_port);
    tokio::select! {
        r = axum::serve(listener, routes(state)) => {
            tracing::warn!("server ended unexpectedly: {:?}", &r)
        },
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("received ctrl+c interrupt, closing server");
        }
    }
    Ok(())
}
