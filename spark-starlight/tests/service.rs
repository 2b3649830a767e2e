use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use serde_json::{json, Value};
use spark_guidance::GuidanceEngine;
use spark_starlight::config::Config;
use spark_starlight::server::{configure, AppState};

fn state() -> web::Data<AppState> {
    let config = Config::default();
    web::Data::new(AppState::new(GuidanceEngine::default(), &config).unwrap())
}

macro_rules! service {
    ($state:expr) => {
        test::init_service(App::new().app_data($state.clone()).configure(configure)).await
    };
}

fn person_frame() -> Value {
    json!({
        "objects": [
            {"name": "person", "confidence": 0.9, "bbox": [220.0, 40.0, 420.0, 470.0]},
            {"name": "chair", "confidence": 0.7, "x": 20.0, "y": 300.0, "w": 80.0, "h": 120.0}
        ],
        "question": "where is the person"
    })
}

#[actix_web::test]
async fn test_root_and_health() {
    let state = state();
    let app = service!(state);

    let req = test::TestRequest::get().uri("/").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "running");

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["sessions"], 0);
    assert_eq!(body["vocabulary"]["labels"], 41);
}

#[actix_web::test]
async fn test_guide() {
    let state = state();
    let app = service!(state);

    let req = test::TestRequest::post()
        .uri("/guide")
        .set_json(person_frame())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["target"], "person");
    assert_eq!(body["direction"], "straight");
    assert_eq!(body["proximity"], "very close");
    assert_eq!(body["target_count"], 1);
    assert!(body["instruction"].as_str().unwrap().contains("the person"));
    assert_eq!(body["navigation_detail"]["position"], "directly ahead");
    assert_eq!(body["precise_note"], "[Precise: straight ahead, 1.9m]");
    assert_eq!(body["objects"][1], json!({
        "name": "chair", "confidence": 0.7, "x": 20, "y": 300, "w": 80, "h": 120
    }));
    assert_eq!(body["scene_description"], "1 person center; 1 chair left");
}

#[actix_web::test]
async fn test_guide_rejects_bad_input() {
    let state = state();
    let app = service!(state);

    let req = test::TestRequest::post()
        .uri("/guide")
        .set_json(json!({"objects": [], "question": "door", "width": 0.0}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "invalid_request");

    let req = test::TestRequest::post()
        .uri("/guide")
        .set_json(json!({"objects": [{"name": " ", "confidence": 0.5}], "question": "door"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "invalid_body");
}

#[actix_web::test]
async fn test_analyze() {
    let state = state();
    let app = service!(state);

    let req = test::TestRequest::post()
        .uri("/analyze")
        .set_json(json!({
            "objects": [{"name": "person", "confidence": 0.9, "bbox": [20.0, 100.0, 120.0, 400.0]}],
            "caption": "a hallway with a door",
            "text": [{"text": "EXIT", "confidence": 0.95}, {"text": "x", "confidence": 0.99}]
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(
        body["scene_description"],
        "Scene: a hallway with a door. Objects detected: 1 person left. Text found: EXIT."
    );
    assert_eq!(body["extracted_text"], "EXIT");
}

#[actix_web::test]
async fn test_find_object_and_navigate() {
    let state = state();
    let app = service!(state);

    let req = test::TestRequest::post()
        .uri("/find-object")
        .set_json(json!({
            "objects": [{"name": "cup", "confidence": 0.8, "bbox": [300.0, 300.0, 340.0, 348.0]}],
            "query": "find my cup"
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "found");
    assert_eq!(body["object_name"], "cup");
    assert_eq!(body["bbox"], json!({"x1": 300.0, "y1": 300.0, "x2": 340.0, "y2": 348.0}));

    let req = test::TestRequest::post()
        .uri("/navigate-to")
        .set_json(json!({"objects": [], "destination": "the exit", "caption": "an empty room"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "not_found");
    assert_eq!(body["environment"], "an empty room");
    assert_eq!(body["exploration_suggestions"].as_array().unwrap().len(), 4);
}

#[actix_web::test]
async fn test_stream_throttle_and_close() {
    let state = state();
    let app = service!(state);

    let req = test::TestRequest::post()
        .uri("/stream/phone-1")
        .set_json(person_frame())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "accepted");
    assert_eq!(body["spoken"], true);
    assert_eq!(body["target"], "person");

    // Immediately after: inside the 300ms throttle window.
    let req = test::TestRequest::post()
        .uri("/stream/phone-1")
        .set_json(person_frame())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({"status": "throttled"}));
    assert_eq!(state.sessions.len(), 1);

    let req = test::TestRequest::delete().uri("/stream/phone-1").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(state.sessions.is_empty());
}

#[actix_web::test]
async fn test_rejected_stream_frame_does_not_throttle() {
    let state = state();
    let app = service!(state);

    let mut bad_frame = person_frame();
    bad_frame["width"] = json!(0.0);
    let req = test::TestRequest::post()
        .uri("/stream/phone-2")
        .set_json(bad_frame)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(state.sessions.is_empty());

    let req = test::TestRequest::post()
        .uri("/stream/phone-2")
        .set_json(person_frame())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "accepted");
    assert_eq!(body["spoken"], true);
}
