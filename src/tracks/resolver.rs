/// Classification of track audio references for playback
///
/// Pure string inspection: nothing here touches the substrate.
use cadenza_core::keys::STORED_REF_PREFIX;
use serde::{Deserialize, Serialize};

const EXTERNAL_SCHEMES: [&str; 3] = ["http://", "https://", "blob:"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "target", rename_all = "camelCase")]
pub enum AudioReference {
    /// Data URI that plays as-is
    Inline,
    /// Payload kept in the store under this key
    StoredKey(String),
    /// Remote or object URL that plays from its origin
    External(String),
    Unresolvable,
}

impl AudioReference {
    pub fn resolve(reference: &str) -> Self {
        let reference = reference.trim();
        if reference.is_empty() {
            return AudioReference::Unresolvable;
        }

        if let Some(key) = reference.strip_prefix(STORED_REF_PREFIX) {
            return if key.is_empty() {
                AudioReference::Unresolvable
            } else {
                AudioReference::StoredKey(key.to_string())
            };
        }

        if let Some(rest) = reference.strip_prefix("data:") {
            return if rest.contains(',') {
                AudioReference::Inline
            } else {
                AudioReference::Unresolvable
            };
        }

        let lower = reference.to_ascii_lowercase();
        if EXTERNAL_SCHEMES.iter().any(|scheme| lower.starts_with(scheme)) {
            return AudioReference::External(reference.to_string());
        }

        AudioReference::Unresolvable
    }

    pub fn is_resolvable(&self) -> bool {
        !matches!(self, AudioReference::Unresolvable)
    }

    pub fn label(&self) -> &'static str {
        match self {
            AudioReference::Inline => "inline",
            AudioReference::StoredKey(_) => "stored",
            AudioReference::External(_) => "external",
            AudioReference::Unresolvable => "unresolvable",
        }
    }
}
