use super::script_repository::ScriptRepository;
use crate::domain::podcast::model::{PodcastScript, SpeakerProfile};
use crate::domain::project::model::SegmentSuggestion;
use crate::domain::voice::model::Dialect;
use async_trait::async_trait;
use serde::Deserialize;

/// Gemini implementation of the text-analysis repository. Structured
/// calls constrain the response with a JSON schema; the enhancement call
/// reads back plain text.
pub struct GeminiScriptRepository {
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
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SegmentsPayload {
    segments: Vec<SegmentSuggestion>,
}

#[derive(Debug, Deserialize)]
struct PodcastPayload {
    #[serde(default)]
    error: Option<String>,
    turns: Vec<crate::domain::podcast::model::PodcastTurn>,
    speakers: Vec<SpeakerProfile>,
}

impl GeminiScriptRepository {
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

    /// Dialect adaptation instructions. Sudanese, Yemeni and Lebanese get
    /// dedicated rewrite prompts; everything else a generic register note.
    fn dialect_instruction(dialect: &Dialect) -> String {
        match dialect.id.as_str() {
            "sudanese" => "أنت خبير لغوي في اللهجة السودانية.\n\
المهمة: تحويل النص التالي إلى اللهجة السودانية الدارجة الخفيفة والمفهومة.\n\
القواعد:\n\
1. استخدم مفردات سودانية أصيلة ومفهومة (مثلاً: شديد، هسة، زول، تمام).\n\
2. طبق قواعد صياغة الجمل السودانية مع الحفاظ على المعنى الأصلي بدقة.\n\
3. تجنب المصطلحات شديدة الصعوبة أو \"الراندوك\" المبالغ فيه.\n\
4. ابتعد تماماً عن أنماط الحديث المصرية أو الخليجية.\n\
5. أخرج النص المعدل فقط."
                .to_string(),
            "yemeni" => "أنت خبير لغوي في اللهجة اليمنية.\n\
المهمة: تحويل النص التالي إلى اللهجة اليمنية البيضاء (المدنية) المفهومة واللطيفة.\n\
القواعد:\n\
1. استخدم مفردات يمنية دارجة خفيفة ومحببة (مثلاً: الحين، كذا، عاد، خلّينا، نشوف، تمام).\n\
2. طبق قواعد صياغة الجمل اليمنية مع الحفاظ على المعنى الأصلي بدقة.\n\
3. التزم بالنبرة اليمنية المدنية الواضحة والمباشرة.\n\
4. تجنب المصطلحات القبلية أو الإقليمية شديدة الصعوبة؛ اجعلها \"لهجة بيضاء\" يمنية.\n\
5. ابتعد تماماً عن أنماط الحديث الخليجية أو السعودية الثقيلة.\n\
6. أخرج النص المعدل فقط."
                .to_string(),
            "lebanese" => "أنت خبير لغوي في اللهجة اللبنانية.\n\
المهمة: تحويل النص التالي إلى اللهجة اللبنانية البيضاء (المدنية) الأنيقة واللطيفة.\n\
القواعد:\n\
1. استخدم مفردات لبنانية دارجة خفيفة ومحببة (مثلاً: هلق، كتير، هيك، خلّينا، تمام، أكيد، مش مشكلة).\n\
2. طبق قواعد صياغة الجمل اللبنانية مع الحفاظ على المعنى الأصلي بدقة ومرونة.\n\
3. التزم بالنبرة اللبنانية المدنية الراقية والواضحة.\n\
4. تجنب المبالغة في اللكنة أو استخدام المصطلحات السوقية؛ اجعلها \"لهجة بيضاء\" لبنانية مهذبة تناسب المحتوى الاحترافي.\n\
5. ابتعد تماماً عن أنماط الحديث المصرية أو الخليجية.\n\
6. أخرج النص المعدل فقط."
                .to_string(),
            _ => format!("الالتزام بنمط وروح اللهجة: {}.", dialect.title),
        }
    }

    /// Podcast dialogue localization guide per dialect.
    fn style_guide(dialect: &Dialect) -> String {
        match dialect.id.as_str() {
            "egyptian" => "يجب توطين الحوار لغوياً ليعكس روح اللهجة المصرية العامية. استخدم تعبيرات مصرية دارجة (مثل: عشان، كده، إيه، مفيش) مع الحفاظ على سلاسة الحوار. يفضل تجنب المفردات شديدة الرسمية.".to_string(),
            "saudi" => "يجب توطين الحوار ليعكس نمط الحديث السعودي الدارج والمهذب. استخدم مفردات وروح اللهجة السعودية.".to_string(),
            "khaleeji" => "يجب أن يعكس الحوار نمط الحديث الخليجي الأبيض الواضح والمريح.".to_string(),
            "levantine" => "يجب توطين الحوار لغوياً ليعكس روح اللهجة الشامية بأسلوبها العذب وتعبيراتها الدارجة (مثل: هيك، شو، كرمال).".to_string(),
            "sudanese" => "يجب توطين الحوار لغوياً ليعكس روح اللهجة السودانية الدافئة. استخدم تعبيرات سودانية دارجة ومحببة (مثل: يا زول، هسة، تمام شديد) مع الحفاظ على الوقار السوداني المعتاد في الحديث.".to_string(),
            "yemeni" => "يجب توطين الحوار ليعكس الأصالة اليمنية والأسلوب اليمني المدني الودود في الحديث. استخدم كلمات مثل (الحين، كذا، عاد، نشوف).".to_string(),
            "lebanese" => "يجب توطين الحوار ليعكس الرقة والأناقة اللبنانية في التعبير (مثل: هلق، كتير، هيك، شو، كيفك، ميرسي، كرمالك، أكيد).".to_string(),
            "fusha" => "يجب أن يكون الحوار باللغة العربية الفصحى السليمة والمعاصرة.".to_string(),
            _ => format!("الالتزام بنمط الحديث الخاص بـ {}.", dialect.title),
        }
    }

    fn speakers_instruction(existing_speakers: &[SpeakerProfile]) -> String {
        if existing_speakers.is_empty() {
            return String::new();
        }
        let roster = existing_speakers
            .iter()
            .map(|s| format!("- ID: {}, Role: {}, Tone: {}", s.id, s.role, s.tone))
            .collect::<Vec<_>>()
            .join("\n");
        format!(
            "STRICT REQUIREMENT: The user has manually defined the following speakers. You MUST include ALL of them in the generated script turns:\n\
{roster}\n\n\
INSTRUCTIONS:\n\
1. Re-analyze the content balance to include all these defined speakers naturally.\n\
2. DO NOT delete, rename, or overwrite any of the IDs or Roles provided above.\n\
3. If the script was previously two speakers and now there are more, expand the narrative turns to give the new characters significant presence.\n\
4. Return all speakers (including the ones provided above) in the \"speakers\" array."
        )
    }

    async fn generate(&self, body: serde_json::Value) -> Result<String, String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.api_base, self.model, self.api_key
        );

        let response = self
            .http_client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "text provider request failed");
                format!("text provider request failed: {e}")
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
                "text provider returned an error"
            );
            return Err(format!("text provider error ({status}): {error_text}"));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| format!("failed to parse provider response: {e}"))?;
        Self::extract_text(parsed)
    }

    fn extract_text(response: GenerateContentResponse) -> Result<String, String> {
        response
            .candidates
            .and_then(|mut c| if c.is_empty() { None } else { Some(c.remove(0)) })
            .and_then(|c| c.content)
            .and_then(|c| c.parts)
            .and_then(|mut p| if p.is_empty() { None } else { Some(p.remove(0)) })
            .and_then(|p| p.text)
            .ok_or_else(|| "provider returned no text payload".to_string())
    }

    fn parse_segments(payload: &str) -> Result<Vec<SegmentSuggestion>, String> {
        let parsed: SegmentsPayload = serde_json::from_str(payload)
            .map_err(|e| format!("failed to parse segmentation payload: {e}"))?;
        Ok(parsed.segments)
    }

    fn parse_podcast(payload: &str) -> Result<PodcastScript, String> {
        let parsed: PodcastPayload = serde_json::from_str(payload)
            .map_err(|e| format!("failed to parse podcast payload: {e}"))?;
        if let Some(error) = parsed.error.filter(|e| !e.trim().is_empty()) {
            return Err(error);
        }
        Ok(PodcastScript {
            turns: parsed.turns,
            speakers: parsed.speakers,
        })
    }
}

#[async_trait]
impl ScriptRepository for GeminiScriptRepository {
    async fn analyze_segments(&self, text: &str) -> Result<Vec<SegmentSuggestion>, String> {
        let system_instruction = "أنت مخرج كتب صوتية خبير. مهمتك هي تحليل النص العربي المرفق وتقسيمه إلى مقاطع سردية منطقية لتوزيع الأصوات.\n\
القواعد:\n\
1. ميز بين السرد (الراوي) والحوار (الشخصيات).\n\
2. قسم النص إلى فقرات أو حوارات مترابطة.\n\
3. اقترح \"دور\" (Role) لكل مقطع (مثلاً: الراوي، البطل، شخصية عابرة).\n\
4. أخرج النتائج بتنسيق JSON حصراً كصفوف تحتوي على (label, role, text).\n\
5. الالتزام باللغة العربية في المخرجات.";

        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": format!("قم بتحليل وتقسيم النص التالي: \"{text}\"") }] }],
            "systemInstruction": { "parts": [{ "text": system_instruction }] },
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "OBJECT",
                    "properties": {
                        "segments": {
                            "type": "ARRAY",
                            "items": {
                                "type": "OBJECT",
                                "properties": {
                                    "label": { "type": "STRING" },
                                    "role": { "type": "STRING" },
                                    "text": { "type": "STRING" }
                                },
                                "required": ["label", "role", "text"]
                            }
                        }
                    },
                    "required": ["segments"]
                }
            }
        });

        let payload = self.generate(body).await?;
        Self::parse_segments(&payload)
    }

    async fn enhance_text(&self, text: &str, dialect: &Dialect) -> Result<String, String> {
        let instruction = Self::dialect_instruction(dialect);
        let prompt = format!(
            "أنت خبير معالجة نصوص في استوديو إنتاج صوتي. مهمتك هي إعادة صياغة النص العربي التالي ليناسب الأداء الصوتي المحترف.\n\
{instruction}\n\
النص المراد معالجته:\n\
\"{text}\"\n\
أخرج النص المعالج فقط بالعربية."
        );

        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        self.generate(body).await
    }

    async fn generate_podcast_script(
        &self,
        content: &str,
        dialect: &Dialect,
        existing_speakers: &[SpeakerProfile],
    ) -> Result<PodcastScript, String> {
        let style_guide = Self::style_guide(dialect);
        let speakers_instruction = Self::speakers_instruction(existing_speakers);
        let system_instruction = format!(
            "أنت خبير صياغة حوارات بودكاست ومخرج فني.\n\
المهمة: تحليل النص المرفق وتنفيذ معالجة ذكية للسيناريو والشخصيات:\n\
1. تحليل الشخصيات: تحديد كافة المتحدثين المذكورين أو المستنبطين من النص بدقة. استخرج العدد الحقيقي للمتحدثين الذين يثرون الحوار بناءً على تعقيد المحتوى.\n\
2. تصنيف الأدوار: حدد الدور لكل شخصية ونبرة الحديث (هادئ، متحمس، رسمي).\n\
3. ذكاء التوزيع: اقترح أفضل فئة صوتية (categoryHint) من الخيارات التالية لكل شخصية جديدة: [doc, ads, cartoon, podcast, novels, youtube, drama, edu, corporate].\n\
4. صياغة السيناريو: تحويل المحتوى إلى حوار منساب طبيعي بين الشخصيات.\n\n\
{speakers_instruction}\n\n\
إرشاد اللهجة:\n\
{style_guide}\n\n\
المخرجات المطلوبة بتنسيق JSON:\n\
- \"speakers\": مصفوفة من الكائنات تحتوي على (id, role, tone, style, gender ['male', 'female', 'any'], categoryHint, description, reasoning).\n\
- \"turns\": مصفوفة من الكائنات (speakerId, text)."
        );

        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": format!("المحتوى المراد تحليله: \"{content}\"") }] }],
            "systemInstruction": { "parts": [{ "text": system_instruction }] },
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "OBJECT",
                    "properties": {
                        "error": { "type": "STRING" },
                        "speakers": {
                            "type": "ARRAY",
                            "items": {
                                "type": "OBJECT",
                                "properties": {
                                    "id": { "type": "STRING" },
                                    "role": { "type": "STRING" },
                                    "tone": { "type": "STRING" },
                                    "style": { "type": "STRING" },
                                    "gender": { "type": "STRING", "enum": ["male", "female", "any"] },
                                    "categoryHint": { "type": "STRING", "enum": ["doc", "ads", "cartoon", "podcast", "novels", "youtube", "drama", "edu", "corporate"] },
                                    "description": { "type": "STRING" },
                                    "reasoning": { "type": "STRING" }
                                },
                                "required": ["id", "role", "tone", "style", "gender", "categoryHint", "description", "reasoning"]
                            }
                        },
                        "turns": {
                            "type": "ARRAY",
                            "items": {
                                "type": "OBJECT",
                                "properties": {
                                    "speakerId": { "type": "STRING" },
                                    "text": { "type": "STRING" }
                                },
                                "required": ["speakerId", "text"]
                            }
                        }
                    },
                    "required": ["turns", "speakers"]
                }
            }
        });

        let payload = self.generate(body).await?;
        Self::parse_podcast(&payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::podcast::model::SpeakerGender;
    use crate::domain::voice::catalog;
    use crate::domain::voice::model::VoiceCategory;

    #[test]
    fn test_parse_segments_payload() {
        let payload = r#"{"segments":[
            {"label":"مشهد 1","role":"الراوي","text":"كان يا ما كان"},
            {"label":"مشهد 2","role":"البطل","text":"قال البطل"}
        ]}"#;
        let segments = GeminiScriptRepository::parse_segments(payload).unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].role, "الراوي");
        assert_eq!(segments[1].text, "قال البطل");
    }

    #[test]
    fn test_parse_podcast_payload() {
        let payload = r#"{
            "turns":[{"speakerId":"s1","text":"أهلاً"}],
            "speakers":[{
                "id":"s1","role":"مقدم","tone":"هادئ","style":"حواري",
                "gender":"male","categoryHint":"podcast",
                "description":"المقدم الرئيسي","reasoning":"محور الحوار"
            }]
        }"#;
        let script = GeminiScriptRepository::parse_podcast(payload).unwrap();
        assert_eq!(script.turns.len(), 1);
        assert_eq!(script.speakers[0].gender, SpeakerGender::Male);
        assert_eq!(script.speakers[0].category_hint, VoiceCategory::Podcast);
    }

    #[test]
    fn test_parse_podcast_surfaces_provider_error() {
        let payload = r#"{"error":"تعذر تحليل المحتوى.","turns":[],"speakers":[]}"#;
        let err = GeminiScriptRepository::parse_podcast(payload).unwrap_err();
        assert_eq!(err, "تعذر تحليل المحتوى.");
    }

    #[test]
    fn test_dialect_instruction_special_cases() {
        let sudanese = catalog::dialect_by_id("sudanese").unwrap();
        assert!(GeminiScriptRepository::dialect_instruction(sudanese).contains("السودانية"));

        let egyptian = catalog::dialect_by_id("egyptian").unwrap();
        let generic = GeminiScriptRepository::dialect_instruction(egyptian);
        assert!(generic.contains(&egyptian.title));
    }

    #[test]
    fn test_speakers_instruction_lists_existing_roster() {
        let speakers = vec![SpeakerProfile {
            id: "s9".to_string(),
            role: "ضيف".to_string(),
            tone: "متحمس".to_string(),
            style: "حواري".to_string(),
            gender: SpeakerGender::Any,
            category_hint: VoiceCategory::Podcast,
            description: String::new(),
            reasoning: String::new(),
        }];
        let instruction = GeminiScriptRepository::speakers_instruction(&speakers);
        assert!(instruction.contains("ID: s9"));
        assert!(instruction.contains("DO NOT delete"));
        assert!(GeminiScriptRepository::speakers_instruction(&[]).is_empty());
    }
}
