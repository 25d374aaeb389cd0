use std::{path::Path, sync::Arc};

use poem::test::{TestForm, TestFormField};
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{core::file_store::FileStore, settings::Config, AppState};

pub fn test_config(upload_dir: &Path) -> Config {
    Config {
        env: "server".to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        prefix: Some("/api".to_string()),
        database_url: "postgres://localhost/profile_service_test".to_string(),
        db_max_connections: 2,
        upload_dir: upload_dir.to_string_lossy().to_string(),
        log_level: "debug".to_string(),
    }
}

pub fn test_app_state(pool: PgPool, config: &Config) -> Arc<AppState> {
    Arc::new(AppState {
        db: pool,
        file_store: FileStore::new(&config.upload_dir),
    })
}

/// Pool that never connects unless a query is issued.
pub fn lazy_pool(config: &Config) -> PgPool {
    PgPoolOptions::new()
        .connect_lazy(&config.database_url)
        .expect("valid database url")
}

pub fn profile_form(email: &str, first_name: &str, last_name: &str) -> TestForm {
    TestForm::new()
        .text("email", email)
        .text("first_name", first_name)
        .text("last_name", last_name)
}

pub fn picture_field(file_name: &str, content_type: &str, bytes: Vec<u8>) -> TestFormField {
    TestFormField::bytes(bytes)
        .name("profile_picture")
        .filename(file_name)
        .content_type(content_type)
}
