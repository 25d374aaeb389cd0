use poem::{http::StatusCode, test::TestClient};
use serde_json::json;
use sqlx::PgPool;
use tempfile::TempDir;

use crate::{
    core::test_utils::{test_app_state, test_config},
    init_openapi_route,
};

#[sqlx::test]
async fn test_health_ok(pool: PgPool) -> anyhow::Result<()> {
    // Given
    let dir = TempDir::new()?;
    let config = test_config(dir.path());
    let app = init_openapi_route(test_app_state(pool, &config), &config);
    let cli = TestClient::new(app);

    // When
    let resp = cli.get("/health").send().await;

    // Expect
    resp.assert_status_is_ok();
    resp.assert_json(&json!({"ok": true})).await;
    Ok(())
}

#[sqlx::test]
async fn test_health_database_down(pool: PgPool) -> anyhow::Result<()> {
    // Given
    let dir = TempDir::new()?;
    let config = test_config(dir.path());
    pool.close().await;
    let app = init_openapi_route(test_app_state(pool, &config), &config);
    let cli = TestClient::new(app);

    // When
    let resp = cli.get("/health").send().await;

    // Expect
    resp.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    resp.assert_json(&json!({"ok": false, "error": "Database not ready"}))
        .await;
    Ok(())
}
