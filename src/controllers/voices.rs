use crate::domain::voice::{catalog, VoiceProfile};
use axum::{extract::Query, Json};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct DialectSummary {
    pub id: String,
    pub title: String,
    pub voice_count: usize,
}

#[derive(Debug, Deserialize)]
pub struct VoiceQuery {
    pub dialect: Option<String>,
}

/// GET /api/voices/dialects - the dialect catalog
pub async fn list_dialects() -> Json<Vec<DialectSummary>> {
    let dialects = catalog::dialects()
        .iter()
        .map(|d| DialectSummary {
            id: d.id.clone(),
            title: d.title.clone(),
            voice_count: d.profiles.len(),
        })
        .collect();
    Json(dialects)
}

/// GET /api/voices?dialect=… - voices of one dialect, or all of them
pub async fn list_voices(Query(query): Query<VoiceQuery>) -> Json<Vec<VoiceProfile>> {
    let profiles = match query.dialect.as_deref() {
        Some(dialect_id) => catalog::pool_for_dialect(dialect_id).to_vec(),
        None => catalog::all_profiles().to_vec(),
    };
    Json(profiles)
}
