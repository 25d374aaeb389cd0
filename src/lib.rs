use std::sync::Arc;

use crate::core::file_store::{FileStore, PUBLIC_PREFIX};
use poem::{
    endpoint::StaticFilesEndpoint,
    get,
    middleware::{AddData, AddDataEndpoint, Cors, CorsEndpoint},
    EndpointExt, Route,
};
use poem_openapi::OpenApiService;
use route::{health::health, user::ApiUser};
use settings::Config;
use sqlx::{Pool, Postgres};

pub mod cli;
pub mod core;
pub mod factory;
pub mod model;
pub mod repository;
pub mod route;
pub mod schema;
pub mod service;
pub mod settings;

pub struct AppState {
    pub db: Pool<Postgres>,
    pub file_store: FileStore,
}

pub fn init_openapi_route(
    app_state: Arc<AppState>,
    config: &Config,
) -> CorsEndpoint<AddDataEndpoint<Route, Arc<AppState>>> {
    let prefix = config.api_prefix();
    let openapi_route = OpenApiService::new(ApiUser, "Profile", "1.0").server(prefix.clone());
    let openapi_json_endpoint = openapi_route.spec_endpoint();
    let ui = openapi_route.swagger_ui();
    Route::new()
        .nest(prefix, openapi_route)
        .nest("/docs", ui)
        .at("openapi.json", openapi_json_endpoint)
        .at("/health", get(health))
        .nest(PUBLIC_PREFIX, StaticFilesEndpoint::new(&config.upload_dir))
        .with(AddData::new(app_state))
        .with(Cors::new())
}
