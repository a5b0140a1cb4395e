use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use avatar_voiceover_backend::controllers::{
    generation::GenerationController, health::HealthState, tts::TtsController,
};
use avatar_voiceover_backend::domain::auth::JwtManager;
use avatar_voiceover_backend::domain::history::HistoryRepository;
use avatar_voiceover_backend::domain::mux::Muxer;
use avatar_voiceover_backend::domain::pipeline::PipelineOrchestrator;
use avatar_voiceover_backend::domain::synthesis::{SynthesisDefaults, SynthesisService};
use avatar_voiceover_backend::domain::video::FrameTranscoder;
use avatar_voiceover_backend::infrastructure::config::{Config, LogFormat};
use avatar_voiceover_backend::infrastructure::db::{check_connection, create_pool, run_migrations};
use avatar_voiceover_backend::infrastructure::http::{build_router, start_http_server};
use avatar_voiceover_backend::infrastructure::media::{FfmpegCodec, FfmpegMuxer};
use avatar_voiceover_backend::infrastructure::repositories::{
    ElevenLabsTtsRepository, LogHistoryRepository, PgHistoryRepository,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        "Starting Avatar Voiceover Backend on {}:{}",
        config.host,
        config.port
    );

    // History store: Postgres when configured, structured log otherwise
    let pool = match &config.database_url {
        Some(database_url) => {
            let pool = create_pool(database_url).await?;
            check_connection(&pool).await?;
            run_migrations(&pool).await?;
            tracing::info!("Database connection verified and migrations applied");
            Some(Arc::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, generation history goes to the log only");
            None
        }
    };

    let history_repo: Arc<dyn HistoryRepository> = match &pool {
        Some(pool) => Arc::new(PgHistoryRepository::new(pool.clone())),
        None => Arc::new(LogHistoryRepository),
    };

    if config.elevenlabs_api_key.is_none() {
        tracing::warn!("ELEVENLABS_API_KEY not set, requests with text will fail");
    }

    std::fs::create_dir_all(&config.workspace_root)?;
    tracing::info!(
        workspace_root = %config.workspace_root.display(),
        ffmpeg = %config.ffmpeg_path.display(),
        video_codec = %config.video_codec,
        "Media pipeline configured"
    );

    let config = Arc::new(config);

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Instantiate adapters
    tracing::info!("Instantiating adapters...");
    let tts_repo = Arc::new(ElevenLabsTtsRepository::new(
        config.elevenlabs_base_url.clone(),
        config.elevenlabs_api_key.clone(),
        Duration::from_secs(config.tts_timeout_secs),
    )?);
    let codec = Arc::new(FfmpegCodec::new(
        config.ffmpeg_path.clone(),
        config.ffprobe_path.clone(),
        config.video_codec.clone(),
    ));
    let mux_process = Arc::new(FfmpegMuxer::new(config.ffmpeg_path.clone()));

    // 2. Instantiate services
    tracing::info!("Instantiating services...");
    let synthesis_defaults = SynthesisDefaults::from_config(&config)?;
    let synthesis_service = Arc::new(SynthesisService::new(
        tts_repo,
        synthesis_defaults,
        config.tts_cache_enabled,
    ));
    let orchestrator = Arc::new(PipelineOrchestrator::new(
        synthesis_service.clone(),
        FrameTranscoder::new(codec),
        Muxer::new(mux_process),
        history_repo,
        config.workspace_root.clone(),
    ));
    let jwt_manager = Arc::new(JwtManager::new(config.jwt_secret.clone()));

    // 3. Instantiate controllers
    tracing::info!("Instantiating controllers...");
    let generation_controller = Arc::new(GenerationController::new(orchestrator));
    let tts_controller = Arc::new(TtsController::new(synthesis_service));
    let health_state = Arc::new(HealthState {
        pool,
        tts_configured: config.elevenlabs_api_key.is_some(),
    });

    let app = build_router(
        &config,
        jwt_manager,
        health_state,
        generation_controller,
        tts_controller,
    );

    start_http_server(config, app).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "avatar_voiceover_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "avatar_voiceover_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
