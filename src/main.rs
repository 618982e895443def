use std::{process, sync::Arc};

use gazette::{
    application::{
        admin::AdminTableService,
        compose::ComposeService,
        error::AppError,
        feed::FeedService,
        repos::{ArticlesRepo, CategoriesRepo},
    },
    config,
    infra::{
        db::SqliteRepositories,
        error::InfraError,
        http::{self, AdminState, HttpState},
        telemetry,
    },
};
use tokio::try_join;
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (_cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    let repositories = init_repositories(&settings).await?;
    let (http_state, admin_state) = build_application_context(repositories, &settings);

    serve_http(&settings, http_state, admin_state).await
}

async fn init_repositories(
    settings: &config::Settings,
) -> Result<Arc<SqliteRepositories>, AppError> {
    let pool = SqliteRepositories::connect(
        &settings.database.url,
        settings.database.max_connections.get(),
    )
    .await
    .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    SqliteRepositories::run_migrations(&pool)
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    Ok(Arc::new(SqliteRepositories::new(pool)))
}

fn build_application_context(
    repositories: Arc<SqliteRepositories>,
    settings: &config::Settings,
) -> (HttpState, AdminState) {
    let articles_repo: Arc<dyn ArticlesRepo> = repositories.clone();
    let categories_repo: Arc<dyn CategoriesRepo> = repositories.clone();

    let feed = Arc::new(FeedService::new(
        articles_repo.clone(),
        categories_repo.clone(),
    ));
    let compose = Arc::new(ComposeService::new(
        articles_repo.clone(),
        categories_repo.clone(),
    ));
    let tables = Arc::new(AdminTableService::new(categories_repo, articles_repo));

    let http_state = HttpState {
        feed,
        compose,
        site: settings.site.clone(),
        db: repositories.clone(),
    };

    let admin_state = AdminState {
        tables,
        db: repositories,
    };

    (http_state, admin_state)
}

async fn serve_http(
    settings: &config::Settings,
    http_state: HttpState,
    admin_state: AdminState,
) -> Result<(), AppError> {
    let public_router = http::build_router(http_state);
    let admin_router = http::build_admin_router(admin_state);

    let public_listener = tokio::net::TcpListener::bind(settings.server.public_addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;
    let admin_listener = tokio::net::TcpListener::bind(settings.server.admin_addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(
        target = "gazette::serve",
        public = %settings.server.public_addr,
        admin = %settings.server.admin_addr,
        "listening",
    );

    let public_server = axum::serve(public_listener, public_router.into_make_service());
    let admin_server = axum::serve(admin_listener, admin_router.into_make_service());

    try_join!(public_server, admin_server)
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    Ok(())
}
