use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use poem::{listener::TcpListener, EndpointExt, Route, Server};
use poem_openapi::OpenApiService;
use sea_orm::Database;

use profiles_backend::api::{AuthApi, HealthApi, ProfileApi};
use profiles_backend::config::{init_logging, Settings};
use profiles_backend::AppData;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    dotenv::dotenv().ok();

    if let Err(err) = init_logging() {
        eprintln!("Failed to initialize logging: {err}");
        std::process::exit(1);
    }

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(err) => {
            tracing::error!(error = %err, "configuration is incomplete");
            std::process::exit(1);
        }
    };

    let db = match Database::connect(&settings.database_url).await {
        Ok(db) => db,
        Err(err) => {
            tracing::error!(error = %err, "database could not be attached to");
            std::process::exit(1);
        }
    };

    if let Err(err) = Migrator::up(&db, None).await {
        tracing::error!(error = %err, "database synchronization was unable to complete");
        std::process::exit(1);
    }
    tracing::info!("database synchronization completed");

    let app_data = match AppData::init(db, settings.clone()) {
        Ok(app_data) => Arc::new(app_data),
        Err(err) => {
            tracing::error!(error = %err, "application data could not be initialized");
            std::process::exit(1);
        }
    };

    let api_service = OpenApiService::new(
        (
            ProfileApi::new(
                Arc::clone(&app_data.registration),
                Arc::clone(&app_data.profiles),
                Arc::clone(&app_data.identity),
            ),
            AuthApi::new(
                Arc::clone(&app_data.identity),
                Arc::clone(&app_data.login_flow),
            ),
            HealthApi,
        ),
        "Profiles API",
        env!("CARGO_PKG_VERSION"),
    )
    .server("/api/v0");

    let ui = api_service.swagger_ui();
    let app = Route::new()
        .nest("/api/v0", api_service)
        .nest("/docs", ui)
        .data(app_data);

    tracing::info!(addr = %settings.bind_addr, "starting server");
    Server::new(TcpListener::bind(&settings.bind_addr))
        .run(app)
        .await
}
