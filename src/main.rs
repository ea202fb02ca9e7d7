use std::{process, sync::Arc};

use foglio::{
    application::{error::AppError, posts::PostService, store::BlobStore},
    config,
    infra::{
        blob::FsBlobStore,
        error::InfraError,
        http::{self, AppState},
        telemetry,
    },
};
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
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

    if settings.admin.token.is_none() {
        warn!(
            target = "foglio::startup",
            "no admin token configured; post creation will be rejected"
        );
    }

    let store: Arc<dyn BlobStore> = Arc::new(
        FsBlobStore::open(&settings.store.directory, &settings.store.namespace)
            .map_err(|err| AppError::from(InfraError::Io(err)))?,
    );
    let posts = Arc::new(PostService::new(
        store.clone(),
        settings.admin.token.clone(),
    ));

    let router = http::build_router(AppState { posts, store });

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(
        target = "foglio::startup",
        addr = %settings.server.addr,
        namespace = %settings.store.namespace,
        "listening"
    );

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to install shutdown handler");
    }
}
