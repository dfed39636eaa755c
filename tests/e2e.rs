use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

use rawi_studio_backend::controllers::podcast::PodcastController;
use rawi_studio_backend::controllers::project::ProjectController;
use rawi_studio_backend::controllers::synthesis::SynthesisController;
use rawi_studio_backend::domain::audio::AudioArtifact;
use rawi_studio_backend::domain::podcast::{
    PodcastScript, PodcastService, PodcastTurn, SpeakerGender, SpeakerProfile,
};
use rawi_studio_backend::domain::project::{ProjectService, SegmentSuggestion};
use rawi_studio_backend::domain::synthesis::model::SpeechRequest;
use rawi_studio_backend::domain::synthesis::{ProductionService, SynthesisService};
use rawi_studio_backend::domain::voice::{Dialect, VoiceCategory};
use rawi_studio_backend::infrastructure::config::{Config, Environment, LogFormat};
use rawi_studio_backend::infrastructure::http::build_router;
use rawi_studio_backend::infrastructure::repositories::{
    ArtifactRepository, ProjectRepository, ScriptRepository, SessionRepository, SpeechRepository,
};

/// Samples every mock synthesis call produces.
const SAMPLES_PER_UNIT: usize = 250;

struct MockSpeechRepository {
    calls: AtomicUsize,
    fail_at: Option<usize>,
}

impl MockSpeechRepository {
    fn new(fail_at: Option<usize>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail_at,
        }
    }
}

#[async_trait]
impl SpeechRepository for MockSpeechRepository {
    async fn synthesize(&self, _request: &SpeechRequest) -> Result<AudioArtifact, String> {
        let index = self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_at == Some(index) {
            return Err("provider unavailable".to_string());
        }
        Ok(AudioArtifact {
            data: vec![0x11; SAMPLES_PER_UNIT * 2],
            sample_rate: 24_000,
            channels: 1,
        })
    }
}

struct MockScriptRepository;

#[async_trait]
impl ScriptRepository for MockScriptRepository {
    async fn analyze_segments(&self, _text: &str) -> Result<Vec<SegmentSuggestion>, String> {
        Ok(vec![
            SegmentSuggestion {
                label: "مشهد 1".to_string(),
                role: "الراوي".to_string(),
                text: "كان يا ما كان".to_string(),
            },
            SegmentSuggestion {
                label: "مشهد 2".to_string(),
                role: "البطل".to_string(),
                text: "قال البطل كلمته".to_string(),
            },
            SegmentSuggestion {
                label: "مشهد 3".to_string(),
                role: "الراوي".to_string(),
                text: "ومضت الحكاية".to_string(),
            },
        ])
    }

    async fn enhance_text(&self, text: &str, _dialect: &Dialect) -> Result<String, String> {
        Ok(format!("{text} (معالج)"))
    }

    async fn generate_podcast_script(
        &self,
        _content: &str,
        _dialect: &Dialect,
        _existing_speakers: &[SpeakerProfile],
    ) -> Result<PodcastScript, String> {
        let speaker = |id: &str, gender: SpeakerGender| SpeakerProfile {
            id: id.to_string(),
            role: format!("دور {id}"),
            tone: "هادئ".to_string(),
            style: "حواري".to_string(),
            gender,
            category_hint: VoiceCategory::Podcast,
            description: String::new(),
            reasoning: String::new(),
        };
        let turn = |id: &str, text: &str| PodcastTurn {
            speaker_id: id.to_string(),
            text: text.to_string(),
        };
        Ok(PodcastScript {
            turns: vec![
                turn("s1", "أهلاً بكم"),
                turn("s2", "سعيدة بالمشاركة"),
                turn("s1", "لنبدأ الحلقة"),
            ],
            speakers: vec![
                speaker("s1", SpeakerGender::Male),
                speaker("s2", SpeakerGender::Female),
            ],
        })
    }
}

fn test_config() -> Arc<Config> {
    Arc::new(Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        environment: Environment::Development,
        log_format: LogFormat::Pretty,
        gemini_api_key: "test-key".to_string(),
        gemini_api_base: "http://localhost".to_string(),
        speech_model: "speech-model".to_string(),
        text_model: "text-model".to_string(),
        pilot_cache_enabled: false,
    })
}

fn build_app(fail_speech_at: Option<usize>) -> Router {
    let project_repo = Arc::new(ProjectRepository::new());
    let session_repo = Arc::new(SessionRepository::new());
    let artifact_repo = Arc::new(ArtifactRepository::new());
    let speech_repo = Arc::new(MockSpeechRepository::new(fail_speech_at));
    let script_repo = Arc::new(MockScriptRepository);

    let synthesis_service = Arc::new(SynthesisService::new(speech_repo, false));
    let project_service = Arc::new(ProjectService::new(project_repo.clone(), script_repo.clone()));
    let production_service = Arc::new(ProductionService::new(
        project_repo,
        artifact_repo.clone(),
        synthesis_service.clone(),
    ));
    let podcast_service = Arc::new(PodcastService::new(
        session_repo,
        artifact_repo.clone(),
        script_repo,
        synthesis_service,
    ));

    build_router(
        test_config(),
        Arc::new(ProjectController::new(project_service)),
        Arc::new(SynthesisController::new(production_service, artifact_repo)),
        Arc::new(PodcastController::new(podcast_service)),
    )
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let request = match body {
        Some(value) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, bytes.to_vec())
}

async fn send_json(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, bytes) = send(app, method, uri, body).await;
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn create_project_with_content(app: &Router, content: &str) -> String {
    let (status, created) = send_json(
        app,
        "POST",
        "/api/projects",
        Some(json!({ "name": "كتاب الاختبار", "dialect_id": "egyptian" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_string();

    let (status, _) = send_json(
        app,
        "PATCH",
        &format!("/api/projects/{id}"),
        Some(json!({ "content": content })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    id
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = build_app(None);

    let (status, body) = send_json(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = send_json(&app, "GET", "/health/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_voice_catalog_is_served() {
    let app = build_app(None);

    let (status, dialects) = send_json(&app, "GET", "/api/voices/dialects", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(dialects.as_array().unwrap().len() >= 5);

    let (status, voices) = send_json(&app, "GET", "/api/voices?dialect=egyptian", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!voices.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_audiobook_flow_from_import_to_master() {
    let app = build_app(None);
    let id =
        create_project_with_content(&app, "الفقرة الأولى\n\nالفقرة الثانية\n\nالفقرة الثالثة").await;

    // Walk the workflow forward.
    for stage in ["import", "script", "distribute"] {
        let (status, _) = send_json(
            &app,
            "POST",
            &format!("/api/projects/{id}/advance"),
            Some(json!({ "stage": stage })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "could not enter stage {stage}");
    }

    // Manual paragraph split: 3 paragraphs → 3 narrator segments with the
    // dialect's default voice.
    let (status, project) = send_json(
        &app,
        "POST",
        &format!("/api/projects/{id}/segments/split"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let segments = project["segments"].as_array().unwrap();
    assert_eq!(segments.len(), 3);
    let default_voice = segments[0]["selected_voice"].as_str().unwrap();
    for segment in segments {
        assert_eq!(segment["role"], "الراوي");
        assert_eq!(segment["selected_voice"], default_voice);
    }

    // Pilot on the first segment.
    let first_segment = segments[0]["id"].as_u64().unwrap();
    let (status, _) = send_json(
        &app,
        "POST",
        &format!("/api/projects/{id}/advance"),
        Some(json!({ "stage": "pilot" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, pilot) = send_json(
        &app,
        "POST",
        &format!("/api/projects/{id}/segments/{first_segment}/pilot"),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let pilot_artifact = pilot["artifact_id"].as_str().unwrap();

    let (status, wav) = send(&app, "GET", &format!("/api/artifacts/{pilot_artifact}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&wav[0..4], b"RIFF");

    // Full master production.
    let (status, master) = send_json(
        &app,
        "POST",
        &format!("/api/projects/{id}/master"),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(master["progress"], 100);
    let master_artifact = master["artifact_id"].as_str().unwrap();

    // 3 segments × SAMPLES_PER_UNIT mono 16-bit samples.
    let (status, wav) = send(&app, "GET", &format!("/api/artifacts/{master_artifact}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let expected_samples = 3 * SAMPLES_PER_UNIT;
    assert_eq!(wav.len(), 44 + 2 * expected_samples);
    assert_eq!(&wav[0..4], b"RIFF");
    let data_size = u32::from_le_bytes([wav[40], wav[41], wav[42], wav[43]]) as usize;
    assert_eq!(data_size, 2 * expected_samples);

    let (status, project) = send_json(&app, "GET", &format!("/api/projects/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(project["stage"], "completed");
    assert_eq!(
        project["master_artifact_id"].as_str().unwrap(),
        master_artifact
    );
    assert_eq!(project["locked"], false);

    let (status, progress) =
        send_json(&app, "GET", &format!("/api/projects/{id}/progress"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(progress["progress"], 100);
}

#[tokio::test]
async fn test_auto_distribution_groups_roles() {
    let app = build_app(None);
    let id = create_project_with_content(&app, "نص الحكاية الكاملة").await;

    let (status, project) = send_json(
        &app,
        "POST",
        &format!("/api/projects/{id}/distribute"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let segments = project["segments"].as_array().unwrap();
    assert_eq!(segments.len(), 3);
    // Both narrator segments share one voice; every segment got a voice.
    assert_eq!(segments[0]["selected_voice"], segments[2]["selected_voice"]);
    for segment in segments {
        assert!(segment["selected_voice"].as_str().is_some());
    }
}

#[tokio::test]
async fn test_master_is_gated_on_missing_voice() {
    let app = build_app(None);
    let id = create_project_with_content(&app, "فقرة\n\nفقرة أخرى").await;

    let (_, project) = send_json(
        &app,
        "POST",
        &format!("/api/projects/{id}/segments/split"),
        None,
    )
    .await;
    let second_segment = project["segments"][1]["id"].as_u64().unwrap();

    // Clear the second segment's voice.
    let (status, _) = send_json(
        &app,
        "PATCH",
        &format!("/api/projects/{id}/segments/{second_segment}"),
        Some(json!({ "selected_voice": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, error) = send_json(
        &app,
        "POST",
        &format!("/api/projects/{id}/master"),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error["message"].as_str().unwrap().contains("voice"));
}

#[tokio::test]
async fn test_batch_failure_produces_no_master() {
    // Second synthesis call fails.
    let app = build_app(Some(1));
    let id = create_project_with_content(&app, "أولى\n\nثانية\n\nثالثة").await;

    send_json(
        &app,
        "POST",
        &format!("/api/projects/{id}/segments/split"),
        None,
    )
    .await;

    let (status, _) = send_json(
        &app,
        "POST",
        &format!("/api/projects/{id}/master"),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (_, project) = send_json(&app, "GET", &format!("/api/projects/{id}"), None).await;
    assert!(project["master_artifact_id"].is_null());
    assert_ne!(project["stage"], "completed");
    assert_eq!(project["locked"], false);
    for segment in project["segments"].as_array().unwrap() {
        assert!(segment["final_artifact_id"].is_null());
    }

    let (_, progress) = send_json(&app, "GET", &format!("/api/projects/{id}/progress"), None).await;
    assert_ne!(progress["progress"], 100);
}

#[tokio::test]
async fn test_pilot_failure_is_isolated_per_segment() {
    // First synthesis call succeeds, the second fails.
    let app = build_app(Some(1));
    let id = create_project_with_content(&app, "أولى\n\nثانية").await;

    let (_, project) = send_json(
        &app,
        "POST",
        &format!("/api/projects/{id}/segments/split"),
        None,
    )
    .await;
    let segments = project["segments"].as_array().unwrap();
    let first = segments[0]["id"].as_u64().unwrap();
    let second = segments[1]["id"].as_u64().unwrap();

    let (status, _) = send_json(
        &app,
        "POST",
        &format!("/api/projects/{id}/segments/{first}/pilot"),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send_json(
        &app,
        "POST",
        &format!("/api/projects/{id}/segments/{second}/pilot"),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    // The first pilot survived the second one's failure.
    let (_, project) = send_json(&app, "GET", &format!("/api/projects/{id}"), None).await;
    let segments = project["segments"].as_array().unwrap();
    assert!(segments[0]["pilot_artifact_id"].as_str().is_some());
    assert!(segments[1]["pilot_artifact_id"].is_null());
}

#[tokio::test]
async fn test_podcast_flow_produces_master() {
    let app = build_app(None);

    let (status, session) = send_json(
        &app,
        "POST",
        "/api/podcasts",
        Some(json!({ "dialect_id": "egyptian" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = session["id"].as_str().unwrap().to_string();

    let (status, session) = send_json(
        &app,
        "POST",
        &format!("/api/podcasts/{id}/script"),
        Some(json!({ "content": "نص الحلقة" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["turns"].as_array().unwrap().len(), 3);
    assert_eq!(session["speakers"].as_array().unwrap().len(), 2);
    let map = session["voice_map"].as_object().unwrap();
    assert_eq!(map.len(), 2);
    assert_ne!(map["s1"], map["s2"]);

    let (status, produced) = send_json(
        &app,
        "POST",
        &format!("/api/podcasts/{id}/produce"),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(produced["progress"], 100);
    let artifact = produced["artifact_id"].as_str().unwrap();

    let (status, wav) = send(&app, "GET", &format!("/api/artifacts/{artifact}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&wav[0..4], b"RIFF");
    assert_eq!(wav.len(), 44 + 2 * 3 * SAMPLES_PER_UNIT);

    let (_, session) = send_json(&app, "GET", &format!("/api/podcasts/{id}"), None).await;
    assert_eq!(session["master_artifact_id"].as_str().unwrap(), artifact);
}

#[tokio::test]
async fn test_smart_redistribution_drops_manual_overrides() {
    let app = build_app(None);

    let (_, session) = send_json(
        &app,
        "POST",
        "/api/podcasts",
        Some(json!({ "dialect_id": "egyptian" })),
    )
    .await;
    let id = session["id"].as_str().unwrap().to_string();

    let (_, session) = send_json(
        &app,
        "POST",
        &format!("/api/podcasts/{id}/script"),
        Some(json!({ "content": "نص الحلقة" })),
    )
    .await;
    let smart_choice = session["voice_map"]["s1"].as_str().unwrap().to_string();

    // Switch to manual and override s1.
    let (status, _) = send_json(
        &app,
        "PUT",
        &format!("/api/podcasts/{id}/distribution/mode"),
        Some(json!({ "mode": "manual" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, voices) = send_json(&app, "GET", "/api/voices?dialect=egyptian", None).await;
    let override_voice = voices
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["id"].as_str().unwrap())
        .find(|v| *v != smart_choice)
        .unwrap()
        .to_string();

    let (status, session) = send_json(
        &app,
        "PUT",
        &format!("/api/podcasts/{id}/distribution/assignments"),
        Some(json!({ "speaker_id": "s1", "voice_id": override_voice })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["voice_map"]["s1"], override_voice);

    // Back to smart: the whole map is recomputed from scratch.
    let (status, session) = send_json(
        &app,
        "PUT",
        &format!("/api/podcasts/{id}/distribution/mode"),
        Some(json!({ "mode": "smart" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["voice_map"]["s1"], smart_choice);
}

#[tokio::test]
async fn test_unknown_resources_return_404() {
    let app = build_app(None);
    let missing = uuid::Uuid::new_v4();

    let (status, _) = send_json(&app, "GET", &format!("/api/projects/{missing}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send_json(&app, "GET", &format!("/api/artifacts/{missing}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send_json(&app, "GET", &format!("/api/podcasts/{missing}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reset_returns_project_to_draft() {
    let app = build_app(None);
    let id = create_project_with_content(&app, "نص\n\nآخر").await;
    send_json(
        &app,
        "POST",
        &format!("/api/projects/{id}/segments/split"),
        None,
    )
    .await;

    let (status, project) = send_json(&app, "POST", &format!("/api/projects/{id}/reset"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(project["stage"], "new");
    assert_eq!(project["content"], "");
    assert_eq!(project["segments"].as_array().unwrap().len(), 1);
}
