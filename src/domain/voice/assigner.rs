use super::model::{VoiceCategory, VoiceProfile};
use crate::domain::podcast::model::SpeakerProfile;
use std::collections::{HashMap, HashSet};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum AssignmentError {
    #[error("voice pool is empty")]
    EmptyPool,
}

/// Sum of the role's UTF-16 character codes. Collisions are fine: the
/// contract is stability, not uniform spread.
pub fn role_hash(role: &str) -> u32 {
    role.encode_utf16()
        .fold(0u32, |acc, unit| acc.wrapping_add(u32::from(unit)))
}

fn is_narrator_role(role: &str) -> bool {
    role.contains("الراوي") || role.to_lowercase().contains("narrator")
}

/// Deterministically pick a voice for a narrative role.
///
/// A role already present in `prior` keeps its voice, so repeated calls
/// within one distribution pass are stable. Narrator roles prefer the
/// first literary- or documentary-flavored profile; every other role (and
/// a narrator with no such profile available) indexes the pool by the
/// role hash. Same role + same ordered pool always yields the same voice.
pub fn assign_voice_for_role(
    role: &str,
    pool: &[VoiceProfile],
    prior: &mut HashMap<String, String>,
) -> Result<String, AssignmentError> {
    if pool.is_empty() {
        return Err(AssignmentError::EmptyPool);
    }
    if let Some(existing) = prior.get(role) {
        return Ok(existing.clone());
    }

    let hashed = &pool[role_hash(role) as usize % pool.len()];
    let chosen = if is_narrator_role(role) {
        pool.iter()
            .find(|p| matches!(p.category, VoiceCategory::Novels | VoiceCategory::Doc))
            .unwrap_or(hashed)
    } else {
        hashed
    };

    prior.insert(role.to_string(), chosen.name.clone());
    Ok(chosen.name.clone())
}

/// Smart podcast distribution: speaker id → voice profile id.
///
/// Entries already present in `prior` are kept untouched and their voices
/// count as used (incremental adaptation after a script re-analysis).
/// Each unassigned speaker is matched by gender, then by category hint
/// when any hinted voice matches. Unused voices always win over reuse:
/// first an unused hinted voice, then any unused gender match, and only
/// once the gender pool is exhausted the first match is reused. A speaker
/// with no gender match stays unassigned; production validation reports
/// it.
pub fn smart_distribution(
    speakers: &[SpeakerProfile],
    pool: &[VoiceProfile],
    prior: &HashMap<String, String>,
) -> HashMap<String, String> {
    let mut map = prior.clone();
    let mut used: HashSet<String> = map.values().cloned().collect();

    for speaker in speakers {
        if map.contains_key(&speaker.id) {
            continue;
        }

        let matches: Vec<&VoiceProfile> = pool
            .iter()
            .filter(|p| speaker.gender.accepts(p.gender))
            .collect();
        let hinted: Vec<&VoiceProfile> = matches
            .iter()
            .copied()
            .filter(|p| p.category == speaker.category_hint)
            .collect();
        let candidates = if hinted.is_empty() { &matches } else { &hinted };

        let selected = candidates
            .iter()
            .find(|p| !used.contains(&p.id))
            .or_else(|| matches.iter().find(|p| !used.contains(&p.id)))
            .or_else(|| candidates.first());

        if let Some(profile) = selected {
            map.insert(speaker.id.clone(), profile.id.clone());
            used.insert(profile.id.clone());
        } else {
            tracing::warn!(
                speaker_id = %speaker.id,
                role = %speaker.role,
                "no voice in the pool matches this speaker"
            );
        }
    }

    map
}
