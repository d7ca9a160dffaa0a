use std::sync::Arc;
use std::time::Duration;

use study_hub::config::AppConfig;
use study_hub::generation::{ChatCompletionsClient, TextGenerator};
use study_hub::transcript::{FetchPlan, TranscriptResolver, YoutubeTranscriptSource};
use study_hub::{build_router, AppState};

// How often idle sessions are swept
const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(300);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    init_logging()?;

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            return Err(e.into());
        }
    };

    let generator = ChatCompletionsClient::new(&config.generation)?;
    if generator.is_configured() {
        tracing::info!("Generation backend: {}", generator.describe());
    } else {
        tracing::warn!("LLM_API_KEY not found. Analysis, formatting and summaries will report an error.");
        tracing::info!("To enable generation, set: LLM_API_KEY and optionally LLM_BASE_URL, LLM_MODEL");
    }

    let source = YoutubeTranscriptSource::new(
        config.transcript.youtube_base_url.clone(),
        config.transcript.timeout,
    );
    let plan = FetchPlan::new(&config.transcript.proxies, &config.transcript.languages);
    tracing::info!(
        "📺 Transcript fetch plan: {} attempts ({} proxies, languages {:?})",
        plan.attempts().len(),
        config.transcript.proxies.len(),
        config.transcript.languages
    );

    let shared_state = Arc::new(AppState::new(
        Arc::new(generator),
        TranscriptResolver::new(Arc::new(source), plan),
    ));

    // Sessions end when idle for longer than the configured timeout
    let sweeper_state = shared_state.clone();
    let session_idle = config.session_idle;
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            let removed = sweeper_state.sessions.purge_idle(session_idle).await;
            if removed > 0 {
                tracing::info!("🧹 Expired {} idle sessions", removed);
            }
        }
    });

    let app = build_router(shared_state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

/// Tracing subscriber: `RUST_LOG` overrides the built-in filter, `LOG_FORMAT=json` emits one JSON object per event
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_filter())?,
    };

    let json = json_output(std::env::var("LOG_FORMAT").ok().as_deref());
    let output = if json {
        fmt::layer().json().flatten_event(true).with_target(true).boxed()
    } else {
        fmt::layer().compact().with_target(false).boxed()
    };

    tracing_subscriber::registry().with(filter).with(output).try_init()?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        json,
        "🎓 Study Hub starting up"
    );
    Ok(())
}

// Used when RUST_LOG is unset
fn default_filter() -> &'static str {
    if cfg!(debug_assertions) {
        "info,study_hub=debug"
    } else {
        "warn,study_hub=info"
    }
}

fn json_output(log_format: Option<&str>) -> bool {
    log_format.is_some_and(|f| f.trim().eq_ignore_ascii_case("json"))
}
