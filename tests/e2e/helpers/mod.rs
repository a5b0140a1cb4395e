use anyhow::Result;
use avatar_voiceover_backend::{
    controllers::{generation::GenerationController, health::HealthState, tts::TtsController},
    domain::{
        auth::JwtManager,
        history::HistoryRepository,
        mux::Muxer,
        pipeline::PipelineOrchestrator,
        synthesis::{SynthesisDefaults, SynthesisService},
        video::FrameTranscoder,
    },
    infrastructure::{
        config::Config, http::build_router, repositories::ElevenLabsTtsRepository,
    },
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use test_context::AsyncTestContext;
use tokio::net::TcpListener;
use uuid::Uuid;

pub mod api_client;

use api_client::TestClient;
use fakes::{ClipCodec, ClipMuxProcess, RecordingHistory};
use mock_provider::MockProvider;

pub const TEST_JWT_SECRET: &str = "test-jwt-secret-key-for-testing-only";
pub const TEST_API_KEY: &str = "test-elevenlabs-key";

/// Knobs for the app under test
pub struct TestOptions {
    pub api_key: Option<String>,
    pub failing_history: bool,
    pub cache_enabled: bool,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            api_key: Some(TEST_API_KEY.to_string()),
            failing_history: false,
            cache_enabled: false,
        }
    }
}

pub struct TestContext {
    pub client: TestClient,
    pub config: Config,
    pub provider: MockProvider,
    pub history: Arc<RecordingHistory>,
    pub mux: Arc<ClipMuxProcess>,
    pub user_id: Uuid,
    pub token: String,
    pub workspace_root: TempDir,
}

impl TestContext {
    pub async fn start(options: TestOptions) -> Result<Self> {
        let provider = MockProvider::start().await?;
        let workspace_root = tempfile::tempdir()?;

        let mut env: HashMap<&str, String> = HashMap::new();
        env.insert("HOST", "127.0.0.1".to_string());
        env.insert("PORT", "0".to_string());
        env.insert("JWT_SECRET", TEST_JWT_SECRET.to_string());
        env.insert("ELEVENLABS_BASE_URL", provider.base_url.clone());
        env.insert("TTS_TIMEOUT_SECS", "5".to_string());
        env.insert("MAX_TEXT_LENGTH", "200".to_string());
        env.insert("MAX_UPLOAD_BYTES", (4 * 1024 * 1024).to_string());
        env.insert(
            "WORKSPACE_ROOT",
            workspace_root.path().display().to_string(),
        );
        env.insert(
            "TTS_CACHE_ENABLED",
            options.cache_enabled.to_string(),
        );
        if let Some(api_key) = &options.api_key {
            env.insert("ELEVENLABS_API_KEY", api_key.clone());
        }
        let config = Config::from_lookup(|key| env.get(key).cloned())
            .map_err(|e| anyhow::anyhow!("invalid test config: {}", e))?;

        let history = Arc::new(if options.failing_history {
            RecordingHistory::failing()
        } else {
            RecordingHistory::default()
        });
        let mux = Arc::new(ClipMuxProcess::default());

        let tts_repo = Arc::new(ElevenLabsTtsRepository::new(
            config.elevenlabs_base_url.clone(),
            config.elevenlabs_api_key.clone(),
            Duration::from_secs(config.tts_timeout_secs),
        )?);
        let synthesis_defaults =
            SynthesisDefaults::from_config(&config).map_err(anyhow::Error::msg)?;
        let synthesis_service = Arc::new(SynthesisService::new(
            tts_repo,
            synthesis_defaults,
            config.tts_cache_enabled,
        ));
        let history_repo: Arc<dyn HistoryRepository> = history.clone();
        let orchestrator = Arc::new(PipelineOrchestrator::new(
            synthesis_service.clone(),
            FrameTranscoder::new(Arc::new(ClipCodec)),
            Muxer::new(mux.clone()),
            history_repo,
            config.workspace_root.clone(),
        ));

        let app = build_router(
            &config,
            Arc::new(JwtManager::new(config.jwt_secret.clone())),
            Arc::new(HealthState {
                pool: None,
                tts_configured: config.elevenlabs_api_key.is_some(),
            }),
            Arc::new(GenerationController::new(orchestrator)),
            Arc::new(TtsController::new(synthesis_service)),
        );

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let user_id = Uuid::new_v4();
        let token = generate_test_jwt(&user_id, TEST_JWT_SECRET);

        Ok(Self {
            client: TestClient::new(&format!("http://{}", addr)),
            config,
            provider,
            history,
            mux,
            user_id,
            token,
            workspace_root,
        })
    }

    /// Invocation directories still present under the workspace root
    pub fn leftover_workspaces(&self) -> usize {
        std::fs::read_dir(self.workspace_root.path())
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}

impl AsyncTestContext for TestContext {
    fn setup() -> impl std::future::Future<Output = Self> + Send {
        async {
            TestContext::start(TestOptions::default())
                .await
                .expect("Failed to start test app")
        }
    }

    fn teardown(self) -> impl std::future::Future<Output = ()> + Send {
        async {
            // Workspace root is removed by TempDir's Drop
        }
    }
}

// Helper to generate valid JWT tokens for testing
pub fn generate_test_jwt(user_id: &Uuid, secret: &str) -> String {
    generate_test_jwt_expiring_in(user_id, secret, chrono::Duration::hours(1))
}

pub fn generate_test_jwt_expiring_in(
    user_id: &Uuid,
    secret: &str,
    expires_in: chrono::Duration,
) -> String {
    use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
    use serde::Serialize;

    #[derive(Serialize)]
    struct Claims {
        sub: String,
        email: String,
        exp: i64,
        iat: i64,
    }

    let now = chrono::Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        email: "test@example.com".to_string(),
        exp: (now + expires_in).timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}
