use std::{path::Path, sync::Arc};

use course_shelf::{
    CourseShelfResult,
    api::CourseShelfApi,
    config::Config,
    lesson_client::LessonClient,
    shelf::{Shelf, ShelfOptions},
    storage::SqliteStore,
};
use poem::{
    EndpointExt, Route, Server,
    listener::TcpListener,
    middleware::{Cors, Tracing as PoemTracing},
};
use poem_openapi::OpenApiService;
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt::SubscriberBuilder, prelude::*};

#[tokio::main]
async fn main() -> CourseShelfResult<()> {
    // Initialize tracing (logs). Respect RUST_LOG if set, default to info for our crate and warn for deps.
    let default_filter = format!(
        "{}=info,poem=info,reqwest=warn,sea_orm=warn,sqlx=warn",
        env!("CARGO_PKG_NAME")
    );
    let env_filter = std::env::var("RUST_LOG").unwrap_or(default_filter);
    SubscriberBuilder::default()
        .with_env_filter(EnvFilter::new(env_filter))
        .with_target(false)
        .with_level(true)
        .pretty()
        .finish()
        .with(ErrorLayer::default())
        .init();
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "starting course shelf"
    );
    // Load environment variables from .env files
    if Path::new(".env.local").exists() {
        dotenvy::from_filename(".env.local")?;
    } else if Path::new(".env").exists() {
        dotenvy::from_filename(".env")?;
    };
    let config = Config::load();
    if let Err(e) = config.validate() {
        return Err(anyhow::anyhow!(e));
    }

    let store = SqliteStore::open(&config.db_connection_string).await?;

    let client =
        LessonClient::new(&config.lesson_api_url)?.with_token(&config.lesson_api_token);
    let has_token = !config.lesson_api_token.is_empty();
    tracing::info!(lesson_api = %config.lesson_api_url, has_token, "configured lesson client");

    let shelf = Shelf::open(
        Arc::new(store),
        Arc::new(client),
        ShelfOptions {
            seed_demo: config.seed_demo_courses,
        },
    )
    .await;

    run_poem(shelf, &config.bind_addr).await?;
    Ok(())
}

pub async fn run_poem(shelf: Shelf, bind_addr: &str) -> CourseShelfResult<()> {
    let version = env!("CARGO_PKG_VERSION");
    let api = CourseShelfApi { shelf };
    let api_service = OpenApiService::new(api, "Course Shelf API", version)
        .server(format!("http://{}", bind_addr));
    let ui = api_service.rapidoc();
    let spec = api_service.spec();
    let route = Route::new()
        .nest("/", api_service)
        .nest("/ui", ui)
        .nest("/spec", poem::endpoint::make_sync(move |_| spec.clone()))
        .with(Cors::new())
        .with(PoemTracing);

    tracing::info!(%bind_addr, "starting HTTP server");
    Server::new(TcpListener::bind(bind_addr.to_string())).run(route).await?;
    Ok(())
}
