use crate::domain::synthesis::voices::DEFAULT_VOICE_NAME;
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub log_format: LogFormat,
    pub jwt_secret: String,
    /// History store; logged only when unset
    pub database_url: Option<String>,
    // ElevenLabs
    pub elevenlabs_api_key: Option<String>,
    pub elevenlabs_base_url: String,
    pub elevenlabs_voice: String,
    pub elevenlabs_stability: f32,
    pub elevenlabs_similarity_boost: f32,
    pub tts_timeout_secs: u64,
    // TTS Cache
    pub tts_cache_enabled: bool,
    // Limits
    pub max_text_length: usize,
    pub max_upload_bytes: usize,
    // Media
    pub ffmpeg_path: PathBuf,
    pub ffprobe_path: PathBuf,
    pub video_codec: String,
    pub workspace_root: PathBuf,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup (environment, test maps).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Box<dyn std::error::Error>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let config = Config {
            host: var("HOST", "0.0.0.0"),
            port: var("PORT", "8080").parse()?,
            environment: match var("ENVIRONMENT", "development").as_str() {
                "production" => Environment::Production,
                _ => Environment::Development,
            },
            log_format: match var("LOG_FORMAT", "pretty").as_str() {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
            jwt_secret: lookup("JWT_SECRET").ok_or("JWT_SECRET must be set")?,
            database_url: optional("DATABASE_URL"),
            elevenlabs_api_key: optional("ELEVENLABS_API_KEY"),
            elevenlabs_base_url: var("ELEVENLABS_BASE_URL", "https://api.elevenlabs.io")
                .trim_end_matches('/')
                .to_string(),
            elevenlabs_voice: var("ELEVENLABS_VOICE", DEFAULT_VOICE_NAME),
            elevenlabs_stability: parse_unit("ELEVENLABS_STABILITY", &var("ELEVENLABS_STABILITY", "0.5"))?,
            elevenlabs_similarity_boost: parse_unit(
                "ELEVENLABS_SIMILARITY_BOOST",
                &var("ELEVENLABS_SIMILARITY_BOOST", "0.5"),
            )?,
            tts_timeout_secs: var("TTS_TIMEOUT_SECS", "60").parse()?,
            tts_cache_enabled: var("TTS_CACHE_ENABLED", "false").to_lowercase() == "true",
            max_text_length: var("MAX_TEXT_LENGTH", "5000").parse()?,
            max_upload_bytes: var("MAX_UPLOAD_BYTES", "52428800").parse()?,
            ffmpeg_path: PathBuf::from(var("FFMPEG_PATH", "ffmpeg")),
            ffprobe_path: PathBuf::from(var("FFPROBE_PATH", "ffprobe")),
            video_codec: var("VIDEO_CODEC", "mpeg4"),
            workspace_root: lookup("WORKSPACE_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|| env::temp_dir().join("avatar-voiceover")),
        };

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }
}

fn parse_unit(key: &str, value: &str) -> Result<f32, Box<dyn std::error::Error>> {
    let parsed: f32 = value.trim().parse()?;
    if !(0.0..=1.0).contains(&parsed) {
        return Err(format!("{} must be between 0 and 1, got {}", key, parsed).into());
    }
    Ok(parsed)
}
