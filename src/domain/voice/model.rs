use serde::{Deserialize, Serialize};

/// Category a voice is produced for. Closed set; doubles as the category
/// hint the script provider may attach to a podcast speaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoiceCategory {
    Doc,
    Ads,
    Cartoon,
    Podcast,
    Novels,
    Youtube,
    Drama,
    Edu,
    Corporate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

/// The five prebuilt voices the synthesis provider exposes. Every catalog
/// profile maps onto one of them via its voice type and gender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BaseVoice {
    Kore,
    Puck,
    Charon,
    Fenrir,
    Zephyr,
}

impl BaseVoice {
    pub fn as_str(&self) -> &'static str {
        match self {
            BaseVoice::Kore => "Kore",
            BaseVoice::Puck => "Puck",
            BaseVoice::Charon => "Charon",
            BaseVoice::Fenrir => "Fenrir",
            BaseVoice::Zephyr => "Zephyr",
        }
    }
}

/// Select the provider base voice for a catalog voice type.
pub fn base_voice_for(voice_type: &str, gender: Gender) -> BaseVoice {
    match gender {
        Gender::Male => match voice_type {
            "عميق" => BaseVoice::Charon,
            "شاب" => BaseVoice::Puck,
            _ => BaseVoice::Fenrir,
        },
        Gender::Female => match voice_type {
            "حيوي" => BaseVoice::Zephyr,
            _ => BaseVoice::Kore,
        },
    }
}

/// One selectable synthetic voice. Immutable catalog entry, shared
/// read-only across projects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceProfile {
    pub id: String,
    pub name: String,
    pub gender: Gender,
    pub voice_type: String,
    pub category: VoiceCategory,
    pub description: String,
}

impl VoiceProfile {
    /// 8-digit numeric identity fingerprint derived from the display name.
    /// Rolling 31·h+c hash over UTF-16 units, truncated to 32 bits.
    pub fn fingerprint(&self) -> String {
        let mut hash: i32 = 0;
        for unit in self.name.encode_utf16() {
            hash = hash
                .wrapping_shl(5)
                .wrapping_sub(hash)
                .wrapping_add(unit as i32);
        }
        hash.unsigned_abs().to_string().chars().take(8).collect()
    }
}

/// A dialect groups the voices recorded for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dialect {
    pub id: String,
    pub title: String,
    pub profiles: Vec<VoiceProfile>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(name: &str) -> VoiceProfile {
        VoiceProfile {
            id: "test_voice".to_string(),
            name: name.to_string(),
            gender: Gender::Male,
            voice_type: "عميق".to_string(),
            category: VoiceCategory::Doc,
            description: String::new(),
        }
    }

    #[test]
    fn test_fingerprint_is_stable() {
        let p = profile("كريم");
        assert_eq!(p.fingerprint(), profile("كريم").fingerprint());
    }

    #[test]
    fn test_fingerprint_is_numeric_and_short() {
        let fp = profile("Laila").fingerprint();
        assert!(fp.len() <= 8);
        assert!(fp.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_fingerprint_differs_between_names() {
        assert_ne!(profile("كريم").fingerprint(), profile("ليلى").fingerprint());
    }

    #[test]
    fn test_base_voice_selection_covers_both_genders() {
        assert_eq!(base_voice_for("عميق", Gender::Male), BaseVoice::Charon);
        assert_eq!(base_voice_for("شاب", Gender::Male), BaseVoice::Puck);
        assert_eq!(base_voice_for("هادئ", Gender::Male), BaseVoice::Fenrir);
        assert_eq!(base_voice_for("حيوي", Gender::Female), BaseVoice::Zephyr);
        assert_eq!(base_voice_for("دافئ", Gender::Female), BaseVoice::Kore);
    }
}
