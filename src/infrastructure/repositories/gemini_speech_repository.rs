use super::speech_repository::SpeechRepository;
use crate::domain::audio::AudioArtifact;
use crate::domain::synthesis::model::SpeechRequest;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;

/// The provider streams raw mono PCM16 at this rate.
const PROVIDER_SAMPLE_RATE: u32 = 24_000;

/// Gemini implementation of the speech repository: one generateContent
/// call per unit with an AUDIO response modality and a prebuilt voice.
pub struct GeminiSpeechRepository {
    http_client: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Option<Vec<CandidatePart>>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(rename = "inlineData")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
struct InlineData {
    data: String,
}

impl GeminiSpeechRepository {
    pub fn new(
        http_client: reqwest::Client,
        api_base: String,
        api_key: String,
        model: String,
    ) -> Self {
        Self {
            http_client,
            api_base,
            api_key,
            model,
        }
    }

    /// Pronunciation rules pinned per dialect so the provider cannot
    /// drift into a neighboring accent.
    fn phonetic_lock(dialect_id: &str) -> &'static str {
        match dialect_id {
            "egyptian" => "STRICT EGYPTIAN PHONETIC LOCK: 1. Pronounce ALL words using natural Egyptian phonetics. 2. (ج) must be soft 'g'. 3. Casual rhythm.",
            "saudi" => "STRICT SAUDI PHONETIC LOCK: 1. Authentic Saudi prosody. 2. Najdi/Hejazi inflections.",
            "khaleeji" => "STRICT KHALEEJI PHONETIC LOCK: 1. Gulf White phonetics. 2. Traditional elongation.",
            "levantine" => "STRICT LEVANTINE PHONETIC LOCK: 1. Syrian/Levantine melodic prosody.",
            "sudanese" => "STRICT SUDANESE PHONETIC LOCK: 1. Authentic Sudanese phonetics. 2. Proper pronunciation of Sudanese 'qaf' and 'jeem'. 3. Calm, warm Sudanese rhythmic pacing.",
            "yemeni" => "STRICT YEMENI PHONETIC LOCK: 1. Clear Arabic pronunciation with a natural urban Yemeni tone. 2. Neutral urban Yemeni style (avoid aggressive tribal sub-dialects). 3. Avoid Gulf-style elongation or Saudi heavy inflections. 4. Calm and natural rhythmic pacing.",
            "lebanese" => "STRICT LEBANESE PHONETIC LOCK: 1. Soft, smooth Arabic pronunciation with light Lebanese musical intonation. 2. Natural urban Lebanese style (Beirut/Modern urban style). 3. Avoid Gulf-style heaviness or strong Egyptian influence. 4. Natural conversational pacing. 5. Specific vowel elongation characteristic of elegant Lebanese speech.",
            _ => "STRICT MSA LOCK: 1. Formal academic Arabic. 2. Correct case endings.",
        }
    }

    fn purpose_directive(purpose: &str) -> Option<&'static str> {
        match purpose {
            "إعلان" => Some("DELIVERY STYLE: Advertisement - energetic, engaging, confident pacing."),
            "قصصي" => Some("DELIVERY STYLE: Narrative - warm, flowing, expressive pacing."),
            "توعوي" => Some("DELIVERY STYLE: Awareness - calm, sincere, reassuring delivery."),
            "إخباري" => Some("DELIVERY STYLE: Informational - neutral, professional, concise."),
            "تعليمي" => Some("DELIVERY STYLE: Educational - clear, steady, explanatory tone."),
            _ => None,
        }
    }

    /// Dialect to pin for this request: the explicit one, otherwise the
    /// voice's home dialect read off its id prefix.
    fn target_dialect(request: &SpeechRequest) -> String {
        if !request.dialect_id.trim().is_empty() {
            return request.dialect_id.clone();
        }
        match request.profile.id.split('_').next() {
            Some("egy") => "egyptian".to_string(),
            Some("sau") => "saudi".to_string(),
            _ => "fusha".to_string(),
        }
    }

    fn build_directive(request: &SpeechRequest) -> String {
        let dialect = Self::target_dialect(request);
        let phonetic_lock = Self::phonetic_lock(&dialect);
        let purpose = request
            .controls
            .purpose
            .as_deref()
            .and_then(Self::purpose_directive)
            .unwrap_or("");

        format!(
            "MODE: READY_FOR_TTS (Text-to-Speech Synthesis Only)\n\
             IDENTITY: {name} ({description})\n\
             FINGERPRINT: {fingerprint}\n\
             DIALECT: {dialect}\n\
             {phonetic_lock}\n\
             {purpose}\n\
             CONTROLS: Speed {speed}, Pitch {pitch}, Emotion {emotion}.\n\
             {note}\n\n\
             TEXT_TO_SYNTHESIZE: \"{text}\"",
            name = request.profile.name,
            description = request.profile.description,
            fingerprint = request.profile.fingerprint(),
            dialect = dialect,
            phonetic_lock = phonetic_lock,
            purpose = purpose,
            speed = request.controls.speed,
            pitch = request.controls.pitch,
            emotion = request.controls.emotion,
            note = request.performance_note,
            text = request.text,
        )
    }

    fn extract_audio(response: GenerateContentResponse) -> Result<Vec<u8>, String> {
        let encoded = response
            .candidates
            .and_then(|mut c| if c.is_empty() { None } else { Some(c.remove(0)) })
            .and_then(|c| c.content)
            .and_then(|c| c.parts)
            .and_then(|mut p| if p.is_empty() { None } else { Some(p.remove(0)) })
            .and_then(|p| p.inline_data)
            .map(|d| d.data)
            .ok_or_else(|| "provider returned no audio payload".to_string())?;

        STANDARD
            .decode(encoded.as_bytes())
            .map_err(|e| format!("failed to decode audio payload: {e}"))
    }
}

#[async_trait]
impl SpeechRepository for GeminiSpeechRepository {
    async fn synthesize(&self, request: &SpeechRequest) -> Result<AudioArtifact, String> {
        let start_time = std::time::Instant::now();
        let directive = Self::build_directive(request);

        tracing::info!(
            voice = %request.profile.name,
            base_voice = request.base_voice.as_str(),
            dialect = %request.dialect_id,
            text_length = request.text.len(),
            "calling speech provider"
        );

        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.api_base, self.model, self.api_key
        );
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": directive }] }],
            "generationConfig": {
                "responseModalities": ["AUDIO"],
                "speechConfig": {
                    "voiceConfig": {
                        "prebuiltVoiceConfig": { "voiceName": request.base_voice.as_str() }
                    }
                }
            }
        });

        let response = self
            .http_client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "speech provider request failed");
                format!("speech provider request failed: {e}")
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!(
                status = %status,
                error = %error_text,
                "speech provider returned an error"
            );
            return Err(format!("speech provider error ({status}): {error_text}"));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| format!("failed to parse provider response: {e}"))?;
        let data = Self::extract_audio(parsed)?;

        tracing::info!(
            provider = "gemini",
            latency_ms = start_time.elapsed().as_millis(),
            audio_size_bytes = data.len(),
            "speech synthesis completed"
        );

        Ok(AudioArtifact {
            data,
            sample_rate: PROVIDER_SAMPLE_RATE,
            channels: 1,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::synthesis::model::VoiceControls;
    use crate::domain::voice::model::{BaseVoice, Gender, VoiceCategory, VoiceProfile};

    fn request(dialect_id: &str, purpose: Option<&str>) -> SpeechRequest {
        let mut controls = VoiceControls::default();
        controls.purpose = purpose.map(str::to_string);
        SpeechRequest {
            text: "مرحباً بكم".to_string(),
            base_voice: BaseVoice::Charon,
            profile: VoiceProfile {
                id: "egy_karim".to_string(),
                name: "كريم".to_string(),
                gender: Gender::Male,
                voice_type: "عميق".to_string(),
                category: VoiceCategory::Doc,
                description: "صوت وثائقي".to_string(),
            },
            controls,
            dialect_id: dialect_id.to_string(),
            performance_note: "Pilot Lock".to_string(),
        }
    }

    #[test]
    fn test_directive_carries_identity_and_text() {
        let directive = GeminiSpeechRepository::build_directive(&request("egyptian", None));
        assert!(directive.contains("IDENTITY: كريم (صوت وثائقي)"));
        assert!(directive.contains("STRICT EGYPTIAN PHONETIC LOCK"));
        assert!(directive.contains("Pilot Lock"));
        assert!(directive.contains("TEXT_TO_SYNTHESIZE: \"مرحباً بكم\""));
    }

    #[test]
    fn test_directive_fingerprint_is_stable() {
        let a = GeminiSpeechRepository::build_directive(&request("egyptian", None));
        let b = GeminiSpeechRepository::build_directive(&request("egyptian", None));
        assert_eq!(a, b);
    }

    #[test]
    fn test_unknown_dialect_falls_back_to_msa_lock() {
        let directive = GeminiSpeechRepository::build_directive(&request("martian", None));
        assert!(directive.contains("STRICT MSA LOCK"));
    }

    #[test]
    fn test_missing_dialect_is_inferred_from_voice_id() {
        let directive = GeminiSpeechRepository::build_directive(&request("", None));
        assert!(directive.contains("STRICT EGYPTIAN PHONETIC LOCK"));
    }

    #[test]
    fn test_purpose_maps_to_delivery_style() {
        let directive = GeminiSpeechRepository::build_directive(&request("fusha", Some("إعلان")));
        assert!(directive.contains("DELIVERY STYLE: Advertisement"));
    }

    #[test]
    fn test_extract_audio_decodes_inline_payload() {
        let pcm: Vec<u8> = vec![0x01, 0x00, 0xFF, 0x7F];
        let body = format!(
            r#"{{"candidates":[{{"content":{{"parts":[{{"inlineData":{{"mimeType":"audio/L16;rate=24000","data":"{}"}}}}]}}}}]}}"#,
            STANDARD.encode(&pcm)
        );
        let parsed: GenerateContentResponse = serde_json::from_str(&body).unwrap();
        assert_eq!(GeminiSpeechRepository::extract_audio(parsed).unwrap(), pcm);
    }

    #[test]
    fn test_extract_audio_rejects_empty_response() {
        let parsed: GenerateContentResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert!(GeminiSpeechRepository::extract_audio(parsed).is_err());
    }
}
