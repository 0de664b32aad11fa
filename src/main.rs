use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::MatchedPath;
use dotenvy::dotenv;
use http::HeaderValue;
use tokio::task::JoinHandle;
use tokio::time::{Duration, sleep};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use blog_api::application::use_cases::indexing::retry_failed::RetryFailedIndexing;
use blog_api::bootstrap::app_context::{AppContext, AppServices};
use blog_api::bootstrap::config::Config;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
        paths(
            blog_api::presentation::http::posts::create_post,
            blog_api::presentation::http::posts::update_post,
            blog_api::presentation::http::posts::get_post,
            blog_api::presentation::http::posts::list_user_posts,
            blog_api::presentation::http::health::health,
        ),
        components(schemas(
            blog_api::presentation::http::posts::SavePostRequest,
            blog_api::presentation::http::posts::SavePostResponse,
            blog_api::presentation::http::posts::PostView,
            blog_api::presentation::http::posts::PostSummaryView,
            blog_api::presentation::http::posts::PostListResponse,
            blog_api::presentation::http::health::HealthResp,
        )),
        tags(
            (name = "Posts", description = "Post management and search indexing"),
            (name = "Health", description = "System health checks")
        )
    )]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "blog_api=debug,axum=info,tower_http=info".into()),
        )
        .init();

    let cfg = Config::from_env()?;
    info!(?cfg, "Starting blog backend");

    // Database
    let pool = blog_api::infrastructure::db::connect_pool(&cfg).await?;
    blog_api::infrastructure::db::migrate(&pool).await?;

    // Repositories and outbound clients are built once and injected;
    // request handlers never construct their own.
    let post_repo = Arc::new(
        blog_api::infrastructure::db::repositories::post_repository_sqlx::SqlxPostRepository::new(
            pool.clone(),
        ),
    );
    let index_outbox = Arc::new(
        blog_api::infrastructure::db::repositories::index_outbox_repository_sqlx::SqlxIndexOutboxRepository::new(
            pool.clone(),
        ),
    );
    let embeddings = Arc::new(
        blog_api::infrastructure::embedding::ReqwestEmbeddingClient::from_config(&cfg),
    );
    let search_index = Arc::new(
        blog_api::infrastructure::search::ReqwestSearchIndexClient::from_config(&cfg),
    );

    let services = AppServices::new(post_repo, index_outbox, embeddings, search_index);
    let ctx = AppContext::new(cfg.clone(), services);

    // Build CORS
    let cors = match cfg.frontend_url.as_deref().map(HeaderValue::from_str) {
        Some(Ok(origin)) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([
                http::Method::GET,
                http::Method::POST,
                http::Method::PUT,
                http::Method::DELETE,
                http::Method::OPTIONS,
            ])
            .allow_headers([http::header::CONTENT_TYPE, http::header::AUTHORIZATION])
            .allow_credentials(true),
        _ => CorsLayer::new()
            .allow_origin(AllowOrigin::mirror_request())
            .allow_methods([
                http::Method::GET,
                http::Method::POST,
                http::Method::PUT,
                http::Method::DELETE,
                http::Method::OPTIONS,
            ])
            .allow_headers([http::header::CONTENT_TYPE, http::header::AUTHORIZATION])
            .allow_credentials(true),
    };

    // Build API router
    let app = Router::new()
        .nest(
            "/api",
            blog_api::presentation::http::health::routes(pool.clone()),
        )
        .nest(
            "/api",
            blog_api::presentation::http::posts::routes(ctx.clone()),
        )
        .merge(SwaggerUi::new("/api/docs").url("/api/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &http::Request<_>| {
                let method = req.method().clone();
                let uri = req.uri().clone();
                let matched = req
                    .extensions()
                    .get::<MatchedPath>()
                    .map(|p| p.as_str().to_string())
                    .unwrap_or_default();
                tracing::info_span!("http", %method, %uri, matched_path = %matched)
            }),
        );

    let api_addr = SocketAddr::from(([0, 0, 0, 0], cfg.api_port));
    info!(%api_addr, "HTTP API listening");
    let listener = tokio::net::TcpListener::bind(api_addr).await?;

    let api_handle: JoinHandle<anyhow::Result<()>> = tokio::spawn(async move {
        axum::serve(listener, app).await?;
        Ok(())
    });

    // Background retry sweep over failed index registrations
    let sweep_ctx = ctx.clone();
    let sweep_handle: JoinHandle<anyhow::Result<()>> = tokio::spawn(async move {
        let interval = Duration::from_secs(sweep_ctx.cfg.retry_interval_secs);
        loop {
            let posts = sweep_ctx.post_repo();
            let outbox = sweep_ctx.index_outbox();
            let embeddings = sweep_ctx.embeddings();
            let index = sweep_ctx.search_index();
            let uc = RetryFailedIndexing {
                posts: posts.as_ref(),
                outbox: outbox.as_ref(),
                embeddings: embeddings.as_ref(),
                index: index.as_ref(),
                chunk_size: sweep_ctx.cfg.chunk_size,
                chunk_overlap: sweep_ctx.cfg.chunk_overlap,
                batch_size: sweep_ctx.cfg.retry_batch_size,
            };
            match uc.execute().await {
                Ok(0) => {}
                Ok(n) => info!(retried = n, "index_retry_sweep_completed"),
                Err(e) => error!(error = ?e, "index_retry_sweep_failed"),
            }
            sleep(interval).await;
        }
    });

    match api_handle.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!(?e, "API server task failed"),
        Err(e) => error!(?e, "API server task panicked"),
    }

    match sweep_handle.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!(?e, "Retry sweep task failed"),
        Err(e) => error!(?e, "Retry sweep task panicked"),
    }
    Ok(())
}
