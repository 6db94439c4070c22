// SmartClip - Serialisation/deserialisation JSON
// Format des documents history.json et config.json
//
// # Format d'une entree (history.json)
// ```text
// {
//   "id":        "1700000000123456789",
//   "content":   "texte" | "data:image/png;base64,...",
//   "type":      "text" | "image",
//   "tagId":     "tag_..." | "",
//   "timestamp": "2024-01-01T12:00:00.123456789Z"
// }
// ```
// Le document est un tableau de ces objets, plus recent en premier.
// Un `tagId` vide signifie "aucun tag".
//
// # Format de config.json
// Voir `config::settings::Config` (champs camelCase).
//
// # Robustesse
// Un enregistrement de type inconnu est ecarte individuellement (avec un
// avertissement) plutot que d'invalider tout le document.

use crate::config::settings::Config;
use crate::error::ScResult;
use crate::history::entry::{ClipboardEntry, EntryKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Enregistrement persiste d'une entree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    pub id: String,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub tag_id: String,
    pub timestamp: DateTime<Utc>,
}

impl From<&ClipboardEntry> for HistoryRecord {
    fn from(entry: &ClipboardEntry) -> Self {
        Self {
            id: entry.id.clone(),
            content: entry.content.to_string(),
            kind: entry.kind.as_str().to_string(),
            tag_id: entry.tag_id.clone().unwrap_or_default(),
            timestamp: entry.created_at,
        }
    }
}

impl HistoryRecord {
    /// Convertit l'enregistrement en entree. None si le type est inconnu.
    pub fn into_entry(self) -> Option<ClipboardEntry> {
        let kind = EntryKind::parse(&self.kind)?;
        Some(ClipboardEntry {
            id: self.id,
            content: self.content.into(),
            kind,
            tag_id: if self.tag_id.is_empty() { None } else { Some(self.tag_id) },
            created_at: self.timestamp,
        })
    }
}

/// Serialise l'historique en document JSON.
pub fn encode_history(entries: &[ClipboardEntry]) -> ScResult<Vec<u8>> {
    let records: Vec<HistoryRecord> = entries.iter().map(HistoryRecord::from).collect();
    Ok(serde_json::to_vec(&records)?)
}

/// Deserialise un document history.json.
pub fn decode_history(data: &[u8]) -> ScResult<Vec<ClipboardEntry>> {
    let records: Vec<HistoryRecord> = serde_json::from_slice(data)?;
    let entries = records
        .into_iter()
        .filter_map(|r| {
            let id = r.id.clone();
            let kind = r.kind.clone();
            let entry = r.into_entry();
            if entry.is_none() {
                warn!(id = %id, kind = %kind, "skipping history record with unknown type");
            }
            entry
        })
        .collect();
    Ok(entries)
}

/// Serialise la configuration en document JSON.
pub fn encode_config(config: &Config) -> ScResult<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(config)?)
}

/// Deserialise un document config.json.
pub fn decode_config(data: &[u8]) -> ScResult<Config> {
    let config: Config = serde_json::from_slice(data)?;
    Ok(config.sanitize())
}
