/// Named provider voices callers may pick by name.
const VOICES: &[(&str, &str)] = &[
    ("Rachel", "21m00Tcm4TlvDq8ikWAM"),
    ("Domi", "AZnzlk1XvdvUeBnXmlld"),
    ("Bella", "EXAVITQu4vr4xnSDxMaL"),
    ("Antoni", "ErXwobaYiN019PkySvjV"),
    ("Elli", "MF3mGyEYCl7XYWbV9V6O"),
    ("Josh", "TxGEqnHWrfWFTfGW9XjX"),
    ("Arnold", "VR6AewLTigWG4xSOukaG"),
    ("Adam", "pNInz6obpgDQGcFmaJgB"),
    ("Sam", "yoZ06aMxZJJ28mfd3POQ"),
    ("Callum", "GBv7mTt0atIp3Br8iCZE"),
    ("Serena", "XB0fDUnXU5powFXDhCwa"),
    ("Freya", "jsCqWAovK2LkecY7zXl4"),
    ("Charlie", "IKne3meq5aSn9XLyUdCD"),
    ("Emily", "LcfcDJNUP1GQjkzn1xUU"),
];

pub const DEFAULT_VOICE_NAME: &str = "Rachel";

/// Provider voice ids are 20 ASCII alphanumerics.
const VOICE_ID_LEN: usize = 20;

/// Look up a catalog voice id by name (case-insensitive)
pub fn voice_id_for_name(name: &str) -> Option<&'static str> {
    VOICES
        .iter()
        .find(|(voice_name, _)| voice_name.eq_ignore_ascii_case(name.trim()))
        .map(|(_, id)| *id)
}

pub fn voice_names() -> Vec<&'static str> {
    VOICES.iter().map(|(name, _)| *name).collect()
}

pub fn looks_like_voice_id(value: &str) -> bool {
    value.len() == VOICE_ID_LEN && value.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Resolve a catalog name or raw provider id. `None` means the value is neither.
pub fn resolve_voice(value: &str) -> Option<String> {
    let value = value.trim();
    if let Some(id) = voice_id_for_name(value) {
        return Some(id.to_string());
    }
    if looks_like_voice_id(value) {
        return Some(value.to_string());
    }
    None
}
