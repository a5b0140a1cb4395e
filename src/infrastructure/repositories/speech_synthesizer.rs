use crate::domain::synthesis::{AudioArtifact, SynthesisRequest, TtsError};
use async_trait::async_trait;

/// Seam over the external text-to-speech provider.
///
/// Implementations are responsible for:
/// - Authenticating with the provider
/// - Mapping provider failures onto `TtsError`
/// - Returning the provider's encoded audio untouched
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Check that a credential is configured. Never touches the network.
    fn ensure_credentials(&self) -> Result<(), TtsError>;

    /// Synthesize speech with exactly one provider call
    ///
    /// # Errors
    /// `MissingCredential` without an API key, `ProviderRejected` on a
    /// non-success status, `Transport` when the provider cannot be reached
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<AudioArtifact, TtsError>;
}
