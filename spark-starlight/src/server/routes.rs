use crate::server::error::ApiError;
use crate::server::AppState;
use crate::stream::FrameAdmission;
use actix_web::{web, HttpResponse};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::json;
use spark_guidance::detect::analysis::{extract_text, TextFragment};
use spark_guidance::{ClientObject, Detection, DetectionInput, FrameContext, GuidanceResult};
use std::time::Instant;

#[derive(Debug, Deserialize)]
pub struct GuideRequest {
    #[serde(default)]
    pub objects: Vec<DetectionInput>,
    #[serde(default)]
    pub question: String,
    pub width: Option<f32>,
    pub height: Option<f32>,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub objects: Vec<DetectionInput>,
    pub caption: Option<String>,
    #[serde(default)]
    pub text: Vec<TextFragment>,
    pub width: Option<f32>,
    pub height: Option<f32>,
}

#[derive(Debug, Deserialize)]
pub struct FindRequest {
    #[serde(default)]
    pub objects: Vec<DetectionInput>,
    pub query: String,
    pub width: Option<f32>,
    pub height: Option<f32>,
}

#[derive(Debug, Deserialize)]
pub struct NavigateRequest {
    #[serde(default)]
    pub objects: Vec<DetectionInput>,
    pub destination: String,
    pub caption: Option<String>,
    pub width: Option<f32>,
    pub height: Option<f32>,
}

#[derive(Debug, Serialize)]
pub struct GuideResponse {
    #[serde(flatten)]
    pub guidance: GuidanceResult,
    pub scene_description: String,
    pub objects: Vec<ClientObject>,
    pub precise_note: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub scene_description: String,
    pub objects: Vec<ClientObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StreamFrame {
    #[serde(flatten)]
    pub frame: GuideResponse,
    /// False when the instruction repeated the previous one and was muted.
    pub spoken: bool,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StreamResponse {
    Throttled,
    Accepted(StreamFrame),
}

fn resolve_frame(
    state: &AppState,
    width: Option<f32>,
    height: Option<f32>,
) -> Result<FrameContext, ApiError> {
    Ok(FrameContext::from_optional(width, height, &state.default_frame)?)
}

fn into_detections(objects: Vec<DetectionInput>) -> Vec<Detection> {
    objects.into_iter().map(Detection::from).collect()
}

fn client_objects(detections: &[Detection]) -> Vec<ClientObject> {
    detections.iter().map(ClientObject::from).collect()
}

fn guide_frame(state: &AppState, frame: &FrameContext, request: GuideRequest) -> GuideResponse {
    let detections = into_detections(request.objects);

    let guidance = state
        .engine
        .compute_guidance(&detections, &request.question, frame);
    let precise_note = guidance
        .navigation_detail
        .as_ref()
        .map(|detail| detail.precise_note());

    GuideResponse {
        scene_description: state.engine.summarize(&detections, frame),
        objects: client_objects(&detections),
        precise_note,
        guidance,
    }
}

pub async fn root() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "message": "Spark Starlight guidance service",
        "status": "running",
    }))
}

pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    let vocabulary = state.engine.vocabulary();
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "sessions": state.sessions.len(),
        "vocabulary": {
            "labels": vocabulary.label_count(),
            "stop_words": vocabulary.stop_word_count(),
        },
    }))
}

pub async fn guide(
    state: web::Data<AppState>,
    request: web::Json<GuideRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = request.into_inner();
    debug!(
        "Guidance for '{}' with {} objects",
        request.question,
        request.objects.len()
    );
    let frame = resolve_frame(&state, request.width, request.height)?;
    let response = guide_frame(&state, &frame, request);
    Ok(HttpResponse::Ok().json(response))
}

pub async fn analyze(
    state: web::Data<AppState>,
    request: web::Json<AnalyzeRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = request.into_inner();
    let frame = resolve_frame(&state, request.width, request.height)?;
    let detections = into_detections(request.objects);

    let scene_description = state.engine.describe_scene(
        &detections,
        &frame,
        request.caption.as_deref(),
        &request.text,
    );
    info!("Scene analysis: {}", scene_description);

    Ok(HttpResponse::Ok().json(AnalyzeResponse {
        scene_description,
        objects: client_objects(&detections),
        extracted_text: extract_text(&request.text),
    }))
}

pub async fn find_object(
    state: web::Data<AppState>,
    request: web::Json<FindRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = request.into_inner();
    let frame = resolve_frame(&state, request.width, request.height)?;
    let detections = into_detections(request.objects);
    info!("Finding object: '{}'", request.query);

    let outcome = state.engine.locate(&detections, &request.query, &frame);
    info!("Object search complete, found: {}", outcome.is_found());
    Ok(HttpResponse::Ok().json(outcome))
}

pub async fn navigate_to(
    state: web::Data<AppState>,
    request: web::Json<NavigateRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = request.into_inner();
    let frame = resolve_frame(&state, request.width, request.height)?;
    let detections = into_detections(request.objects);
    info!("Navigating to: '{}'", request.destination);

    let plan = state.engine.plan_route(
        &detections,
        &request.destination,
        request.caption.as_deref(),
        &frame,
    );
    info!("Navigation complete, found: {}", plan.is_found());
    Ok(HttpResponse::Ok().json(plan))
}

pub async fn stream_frame(
    state: web::Data<AppState>,
    session: web::Path<String>,
    request: web::Json<GuideRequest>,
) -> Result<HttpResponse, ApiError> {
    let session = session.into_inner();
    let request = request.into_inner();
    // Validated before admission so a rejected frame never starts the throttle window.
    let frame = resolve_frame(&state, request.width, request.height)?;
    let now = Instant::now();

    if state.sessions.admit(&session, now) == FrameAdmission::Throttled {
        return Ok(HttpResponse::Ok().json(StreamResponse::Throttled));
    }

    let mut response = guide_frame(&state, &frame, request);
    let spoken = state
        .sessions
        .should_speak(&session, &response.guidance.instruction, now);
    if !spoken {
        response.guidance.instruction.clear();
    }

    Ok(HttpResponse::Ok().json(StreamResponse::Accepted(StreamFrame {
        frame: response,
        spoken,
    })))
}

pub async fn close_stream(state: web::Data<AppState>, session: web::Path<String>) -> HttpResponse {
    state.sessions.close(&session);
    HttpResponse::NoContent().finish()
}
