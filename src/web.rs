use actix_web::{middleware, web, App, HttpResponse, HttpServer, Result};
use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::roster::{
    export_availability_csv, export_optimized_csv, optimize, summarize, Assignment,
    OptimizeOptions, Schedule, ScheduleOptions, EXPORT_FILENAME,
};
use crate::store::AvailabilityStore;

/// In-memory application state; a real deployment would persist this.
#[derive(Default)]
pub struct AppState {
    pub schedules: Mutex<HashMap<String, Schedule>>,
    pub availability: Mutex<HashMap<String, AvailabilityStore>>,
    pub assignments: Mutex<HashMap<String, Vec<Assignment>>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateScheduleRequest {
    pub title: String,
    pub start_hour: u32,
    pub end_hour: u32,
    #[serde(flatten)]
    pub options: ScheduleOptions,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAvailabilityRequest {
    pub participant_name: String,
    pub availability_binary: String,
}

fn schedule_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({"error": "schedule not found"}))
}

fn new_join_code() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(char::from)
        .collect::<String>()
        .to_lowercase()
}

async fn create_schedule(
    req: web::Json<CreateScheduleRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let req = req.into_inner();
    let mut schedules = state.schedules.lock().unwrap();

    let mut code = new_join_code();
    while schedules.contains_key(&code) {
        code = new_join_code();
    }

    let schedule = Schedule {
        code: code.clone(),
        title: req.title,
        start_hour: req.start_hour,
        end_hour: req.end_hour,
        options: req.options,
    };
    if let Err(reason) = schedule.validate() {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({"error": reason})));
    }

    schedules.insert(code.clone(), schedule.clone());
    state
        .availability
        .lock()
        .unwrap()
        .insert(code, AvailabilityStore::new());
    Ok(HttpResponse::Ok().json(serde_json::json!({"data": schedule})))
}

async fn get_schedule(code: web::Path<String>, state: web::Data<AppState>) -> Result<HttpResponse> {
    let schedules = state.schedules.lock().unwrap();
    match schedules.get(code.as_str()) {
        Some(schedule) => Ok(HttpResponse::Ok().json(serde_json::json!({"data": schedule}))),
        None => Ok(schedule_not_found()),
    }
}

async fn update_options(
    code: web::Path<String>,
    req: web::Json<ScheduleOptions>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let mut schedules = state.schedules.lock().unwrap();
    match schedules.get_mut(code.as_str()) {
        Some(schedule) => {
            schedule.options = req.into_inner();
            Ok(HttpResponse::Ok().json(serde_json::json!({"data": schedule})))
        }
        None => Ok(schedule_not_found()),
    }
}

async fn list_availability(
    code: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    if !state.schedules.lock().unwrap().contains_key(code.as_str()) {
        return Ok(schedule_not_found());
    }
    let availability = state.availability.lock().unwrap();
    let records = availability
        .get(code.as_str())
        .map(|store| store.records().to_vec())
        .unwrap_or_default();
    Ok(HttpResponse::Ok().json(serde_json::json!({"data": records})))
}

async fn submit_availability(
    code: web::Path<String>,
    req: web::Json<SubmitAvailabilityRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let expected_len = {
        let schedules = state.schedules.lock().unwrap();
        match schedules.get(code.as_str()) {
            Some(schedule) => schedule.bits_len(),
            None => return Ok(schedule_not_found()),
        }
    };

    let mut availability = state.availability.lock().unwrap();
    let store = availability.entry(code.to_string()).or_default();
    match store.submit(&req.participant_name, &req.availability_binary, expected_len) {
        Ok(record) => Ok(HttpResponse::Ok().json(serde_json::json!({"data": record}))),
        Err(reason) => Ok(HttpResponse::BadRequest().json(serde_json::json!({"error": reason}))),
    }
}

async fn delete_availability(
    path: web::Path<(String, u64)>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let (code, id) = path.into_inner();
    if !state.schedules.lock().unwrap().contains_key(&code) {
        return Ok(schedule_not_found());
    }
    let mut availability = state.availability.lock().unwrap();
    let deleted = availability
        .get_mut(&code)
        .map(|store| store.delete(id))
        .unwrap_or(false);
    if deleted {
        Ok(HttpResponse::Ok().json(serde_json::json!({"data": {"deleted": id}})))
    } else {
        Ok(HttpResponse::NotFound().json(serde_json::json!({"error": "availability not found"})))
    }
}

async fn run_optimize(
    code: web::Path<String>,
    req: web::Json<OptimizeOptions>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let schedule = {
        let schedules = state.schedules.lock().unwrap();
        match schedules.get(code.as_str()) {
            Some(schedule) => schedule.clone(),
            None => return Ok(schedule_not_found()),
        }
    };
    let records = {
        let availability = state.availability.lock().unwrap();
        availability
            .get(code.as_str())
            .map(|store| store.records().to_vec())
            .unwrap_or_default()
    };

    let result = optimize(&schedule, &records, &req);
    log::info!(
        "optimized schedule {}: {} assignments from {} submissions",
        schedule.code,
        result.len(),
        records.len()
    );

    // each optimize call replaces the snapshot wholesale
    state
        .assignments
        .lock()
        .unwrap()
        .insert(code.to_string(), result.clone());
    Ok(HttpResponse::Ok().json(serde_json::json!({"data": result})))
}

async fn get_summary(code: web::Path<String>, state: web::Data<AppState>) -> Result<HttpResponse> {
    let min_hours = {
        let schedules = state.schedules.lock().unwrap();
        match schedules.get(code.as_str()) {
            Some(schedule) => schedule.options.min_hours_per_participant.unwrap_or(1),
            None => return Ok(schedule_not_found()),
        }
    };
    let names = {
        let availability = state.availability.lock().unwrap();
        availability
            .get(code.as_str())
            .map(|store| store.names())
            .unwrap_or_default()
    };
    let assignments = state.assignments.lock().unwrap();
    let snapshot = assignments.get(code.as_str()).cloned().unwrap_or_default();
    let summary = summarize(&snapshot, &names, min_hours);
    Ok(HttpResponse::Ok().json(serde_json::json!({"data": summary})))
}

async fn download_optimized_csv(
    code: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let schedule = {
        let schedules = state.schedules.lock().unwrap();
        match schedules.get(code.as_str()) {
            Some(schedule) => schedule.clone(),
            None => return Ok(schedule_not_found()),
        }
    };
    let assignments = state.assignments.lock().unwrap();
    let snapshot = assignments.get(code.as_str()).cloned().unwrap_or_default();
    let csv = export_optimized_csv(&snapshot, schedule.start_hour, schedule.end_hour);
    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", EXPORT_FILENAME),
        ))
        .body(csv))
}

async fn download_availability_csv(
    code: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    if !state.schedules.lock().unwrap().contains_key(code.as_str()) {
        return Ok(schedule_not_found());
    }
    let availability = state.availability.lock().unwrap();
    let records = availability
        .get(code.as_str())
        .map(|store| store.records().to_vec())
        .unwrap_or_default();
    let csv = export_availability_csv(&records)
        .map_err(|e| actix_web::error::ErrorInternalServerError(e.to_string()))?;
    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            "Content-Disposition",
            "attachment; filename=\"availability.csv\"",
        ))
        .body(csv))
}

/// Route table, shared by the server and the handler tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/schedules", web::post().to(create_schedule))
        .route("/api/schedules/{code}", web::get().to(get_schedule))
        .route("/api/schedules/{code}/options", web::put().to(update_options))
        .route(
            "/api/schedules/{code}/availability",
            web::get().to(list_availability),
        )
        .route(
            "/api/schedules/{code}/availability",
            web::post().to(submit_availability),
        )
        .route(
            "/api/schedules/{code}/availability/{id}",
            web::delete().to(delete_availability),
        )
        .route(
            "/api/schedules/{code}/availability.csv",
            web::get().to(download_availability_csv),
        )
        .route("/api/schedules/{code}/optimize", web::post().to(run_optimize))
        .route("/api/schedules/{code}/summary", web::get().to(get_summary))
        .route(
            "/api/schedules/{code}/export.csv",
            web::get().to(download_optimized_csv),
        );
}

pub async fn start_server(port: u16) -> std::io::Result<()> {
    let app_state = web::Data::new(AppState::default());

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .configure(configure)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::dev::{Service, ServiceResponse};
    use actix_web::{http::StatusCode, test};

    async fn test_app(
        state: web::Data<AppState>,
    ) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>
    {
        test::init_service(App::new().app_data(state).configure(configure)).await
    }

    async fn create_test_schedule(
        app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    ) -> String {
        let req = test::TestRequest::post()
            .uri("/api/schedules")
            .set_json(serde_json::json!({
                "title": "주간 근무표",
                "startHour": 12,
                "endHour": 14,
                "minHoursPerParticipant": 1,
                "maxHoursPerParticipant": 2,
                "participantsPerSlot": 1
            }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(app, req).await;
        body["data"]["code"].as_str().unwrap().to_string()
    }

    #[actix_web::test]
    async fn schedule_round_trip() {
        let app = test_app(web::Data::new(AppState::default())).await;
        let code = create_test_schedule(&app).await;

        let req = test::TestRequest::get()
            .uri(&format!("/api/schedules/{}", code))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["startHour"], 12);
        assert_eq!(body["data"]["endHour"], 14);
    }

    #[actix_web::test]
    async fn unknown_code_is_a_404() {
        let app = test_app(web::Data::new(AppState::default())).await;
        let req = test::TestRequest::get()
            .uri("/api/schedules/nope99")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn invalid_hour_range_is_rejected() {
        let app = test_app(web::Data::new(AppState::default())).await;
        let req = test::TestRequest::post()
            .uri("/api/schedules")
            .set_json(serde_json::json!({
                "title": "bad",
                "startHour": 14,
                "endHour": 12,
                "participantsPerSlot": 1
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn submit_validates_and_stores() {
        let app = test_app(web::Data::new(AppState::default())).await;
        let code = create_test_schedule(&app).await;

        let req = test::TestRequest::post()
            .uri(&format!("/api/schedules/{}/availability", code))
            .set_json(serde_json::json!({
                "participantName": "김민수",
                "availabilityBinary": "1".repeat(20)
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        // wrong length is rejected before any state change
        let req = test::TestRequest::post()
            .uri(&format!("/api/schedules/{}/availability", code))
            .set_json(serde_json::json!({
                "participantName": "Lee",
                "availabilityBinary": "101"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::get()
            .uri(&format!("/api/schedules/{}/availability", code))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"][0]["participantName"], "김민수");
    }

    #[actix_web::test]
    async fn optimize_replaces_the_snapshot_and_exports() {
        let app = test_app(web::Data::new(AppState::default())).await;
        let code = create_test_schedule(&app).await;

        let req = test::TestRequest::post()
            .uri(&format!("/api/schedules/{}/availability", code))
            .set_json(serde_json::json!({
                "participantName": "Kim",
                "availabilityBinary": "1".repeat(20)
            }))
            .to_request();
        test::call_service(&app, req).await;

        let req = test::TestRequest::post()
            .uri(&format!("/api/schedules/{}/optimize", code))
            .set_json(serde_json::json!({"applyTravelBuffer": false}))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        // one participant capped at 2 hours
        assert_eq!(body["data"].as_array().unwrap().len(), 2);

        let req = test::TestRequest::get()
            .uri(&format!("/api/schedules/{}/export.csv", code))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = test::read_body(resp).await;
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.starts_with('\u{FEFF}'));
        assert!(text.contains("시간,월,화,수,목,금"));
    }

    #[actix_web::test]
    async fn delete_removes_a_record() {
        let app = test_app(web::Data::new(AppState::default())).await;
        let code = create_test_schedule(&app).await;

        let req = test::TestRequest::post()
            .uri(&format!("/api/schedules/{}/availability", code))
            .set_json(serde_json::json!({
                "participantName": "Kim",
                "availabilityBinary": "1".repeat(20)
            }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        let id = body["data"]["id"].as_u64().unwrap();

        let req = test::TestRequest::delete()
            .uri(&format!("/api/schedules/{}/availability/{}", code, id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/schedules/{}/availability/{}", code, id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
