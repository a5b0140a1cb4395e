pub mod elevenlabs_tts_repository;
pub mod history_repository;
pub mod speech_synthesizer;

pub use elevenlabs_tts_repository::ElevenLabsTtsRepository;
pub use history_repository::{LogHistoryRepository, PgHistoryRepository};
pub use speech_synthesizer::SpeechSynthesizer;
