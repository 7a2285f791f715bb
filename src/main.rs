use std::sync::{Arc, Mutex};

use axum::routing::{delete, get, post};
use axum::Router;
use chrono::Utc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use smiledesk::config::AppConfig;
use smiledesk::db;
use smiledesk::handlers;
use smiledesk::services::ai::groq::GroqProvider;
use smiledesk::services::ai::ollama::OllamaProvider;
use smiledesk::services::ai::LlmProvider;
use smiledesk::services::calendar::{
    CalendarProvider, HttpCalendarProvider, LocalCalendarProvider,
};
use smiledesk::services::sessions::SessionRegistry;
use smiledesk::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;
    let db = Arc::new(Mutex::new(conn));

    let llm: Box<dyn LlmProvider> = match config.llm_provider.as_str() {
        "groq" => {
            anyhow::ensure!(
                !config.groq_api_key.is_empty(),
                "GROQ_API_KEY must be set when LLM_PROVIDER=groq"
            );
            tracing::info!("using Groq LLM provider (model: {})", config.groq_model);
            Box::new(GroqProvider::new(
                config.groq_api_key.clone(),
                config.groq_model.clone(),
            ))
        }
        _ => {
            tracing::info!("using Ollama LLM provider (url: {})", config.ollama_url);
            Box::new(OllamaProvider::new(
                config.ollama_url.clone(),
                config.ollama_model.clone(),
            ))
        }
    };

    let calendar: Box<dyn CalendarProvider> = match config.calendar_provider.as_str() {
        "http" => {
            anyhow::ensure!(
                !config.calendar_url.is_empty(),
                "CALENDAR_URL must be set when CALENDAR_PROVIDER=http"
            );
            tracing::info!("using HTTP calendar provider (url: {})", config.calendar_url);
            Box::new(HttpCalendarProvider::new(
                config.calendar_url.clone(),
                config.calendar_api_key.clone(),
            ))
        }
        _ => {
            tracing::info!("using local calendar provider");
            Box::new(LocalCalendarProvider::new(Arc::clone(&db)))
        }
    };

    let state = Arc::new(AppState {
        db,
        sessions: SessionRegistry::new(config.session_ttl_minutes),
        config: config.clone(),
        llm,
        calendar,
    });

    // Sweep idle sessions in the background.
    {
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(std::time::Duration::from_secs(60));
            loop {
                interval.tick().await;
                state.sessions.expire_idle(Utc::now().naive_utc());
            }
        });
    }

    let app = Router::new()
        .route("/health", get(handlers::health))
        .route("/api/start-session", post(handlers::session::start_session))
        .route("/api/send-message", post(handlers::session::send_message))
        .route("/api/reset-session", post(handlers::session::reset_session))
        .route("/api/end-session", post(handlers::session::end_session))
        .route("/api/get-history", get(handlers::session::get_history))
        .route(
            "/api/admin/appointments",
            get(handlers::admin::get_appointments),
        )
        .route(
            "/api/admin/appointments/:id",
            delete(handlers::admin::delete_appointment),
        )
        .route("/api/admin/customers", get(handlers::admin::get_customers))
        .route("/api/admin/status", get(handlers::admin::get_status))
        .route("/calendar/feed.ics", get(handlers::calendar::calendar_feed))
        .route("/calendar/:customer_id", get(handlers::calendar::download_ics))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
