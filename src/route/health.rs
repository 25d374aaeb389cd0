use std::sync::Arc;

use poem::{handler, http::StatusCode, web::Data, web::Json};

use crate::{core::db::ping, schema::health::HealthResponse, AppState};

#[handler]
pub async fn health(state: Data<&Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    match ping(&state.db).await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                ok: true,
                error: None,
            }),
        ),
        Err(err) => {
            tracing::error!("health check failed: {:?}", err);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    ok: false,
                    error: Some("Database not ready".to_string()),
                }),
            )
        }
    }
}
