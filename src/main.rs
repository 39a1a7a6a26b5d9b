use anyhow::Result;
use axum::Router;
use diesel_migrations::{EmbeddedMigrations, embed_migrations};
use eldercare_marketplace::{
    common::{
        app_state::AppState,
        bootstrap::{self, bootstrap},
        config, db, swagger,
    },
    routes,
};

/// Migrations embedded into the binary which helps with streamlining image building process
const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

#[tokio::main]
async fn main() -> Result<()> {
    bootstrap::init_tracing();
    bootstrap::init_env();

    let config = config::load()?;
    tracing::debug!(?config, "Configuration loaded");

    tracing::info!("Running migrations...");
    let migrations_count = db::run_migrations_blocking(MIGRATIONS, &config.database.url).await?;
    tracing::info!("Run {} new migrations successfully", migrations_count);

    let server = config.server.clone();
    let state = AppState::init(config).await?;

    let routes = routes::routes_with_openapi(state.token_verifier.clone());

    let mut openapi = routes.get_openapi().clone();
    openapi.info = utoipa::openapi::InfoBuilder::new()
        .title("Forever Young Marketplace API")
        .version("1.0.0")
        .build();
    let swagger_ui = swagger::create_swagger_ui(openapi);

    let app = Router::new().merge(routes).merge(swagger_ui);

    tracing::info!("Bootstrapping...");
    bootstrap("Marketplace", app, state, &server).await?;
    Ok(())
}
