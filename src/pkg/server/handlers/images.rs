use axum::{
    extract::{Path, State},
    http::header::CONTENT_TYPE,
    response::IntoResponse,
};

use crate::{pkg::server::state::AppState, prelude::Result};

pub async fn retrieve(State(state): State<AppState>, Path(key): Path<String>) -> Result<impl IntoResponse> {
    let (data, content_type) = state.images.get(&key).await?;
    tracing::debug!("retrieved {} of type: {}, size: {} bytes", &key, &content_type, data.len());
    Ok(([(CONTENT_TYPE, content_type)], data))
}
