// In-process stand-in for the hosted backend, shared by the integration tests
#![allow(dead_code)]

use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use trainer_auth::settings::TrainerSettings;

pub const API_KEY: &str = "test-anon-key";
pub const GOOD_TOKEN: &str = "good-token";
pub const REFRESHED_TOKEN: &str = "refreshed-token";
pub const PASSWORD: &str = "secret123";

/// One request as seen by the mock backend
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: String,
    pub apikey: Option<String>,
    pub authorization: Option<String>,
    pub prefer: Option<String>,
    pub body: Option<Value>,
}

#[derive(Clone, Default)]
pub struct Recorder {
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl Recorder {
    fn record(&self, req: &HttpRequest, body: Option<&Value>) {
        let header = |name: &str| {
            req.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(ToString::to_string)
        };
        self.requests.lock().unwrap().push(Recorded {
            method: req.method().to_string(),
            path: req.path().to_string(),
            query: req.query_string().to_string(),
            apikey: header("apikey"),
            authorization: header("authorization"),
            prefer: header("prefer"),
            body: body.cloned(),
        });
    }

    pub fn all(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn to_path(&self, path: &str) -> Vec<Recorded> {
        self.all().into_iter().filter(|r| r.path == path).collect()
    }
}

pub fn backend_user(id: &str, email: &str) -> Value {
    json!({
        "id": id,
        "email": email,
        "user_metadata": { "full_name": "Jane Doe" }
    })
}

pub fn session_json(access_token: &str) -> Value {
    json!({
        "access_token": access_token,
        "refresh_token": "refresh-1",
        "expires_in": 3600,
        "token_type": "bearer",
        "user": backend_user("user-1", "jane@example.com")
    })
}

fn bearer(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(ToString::to_string)
}

async fn token(
    req: HttpRequest,
    recorder: web::Data<Recorder>,
    query: web::Query<HashMap<String, String>>,
    body: web::Json<Value>,
) -> HttpResponse {
    recorder.record(&req, Some(&body.0));
    match query.get("grant_type").map(String::as_str) {
        Some("password") if body["password"] == PASSWORD => HttpResponse::Ok().json(session_json(GOOD_TOKEN)),
        Some("password") => HttpResponse::BadRequest().json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid login credentials"
        })),
        Some("refresh_token") if body["refresh_token"] == "refresh-1" => {
            HttpResponse::Ok().json(session_json(REFRESHED_TOKEN))
        }
        _ => HttpResponse::BadRequest().json(json!({ "error": "unsupported_grant_type" })),
    }
}

async fn signup(req: HttpRequest, recorder: web::Data<Recorder>, body: web::Json<Value>) -> HttpResponse {
    recorder.record(&req, Some(&body.0));
    if body["email"] == "taken@example.com" {
        return HttpResponse::UnprocessableEntity().json(json!({ "code": 422, "msg": "User already registered" }));
    }
    HttpResponse::Ok().json(json!({
        "user": backend_user("user-2", body["email"].as_str().unwrap_or_default()),
        "session": null
    }))
}

async fn user(req: HttpRequest, recorder: web::Data<Recorder>) -> HttpResponse {
    recorder.record(&req, None);
    match bearer(&req).as_deref() {
        Some(GOOD_TOKEN) => HttpResponse::Ok().json(backend_user("user-1", "jane@example.com")),
        Some(REFRESHED_TOKEN) => HttpResponse::Ok().json(backend_user("user-1", "jane.refreshed@example.com")),
        _ => HttpResponse::Unauthorized().json(json!({ "code": 401, "msg": "invalid JWT" })),
    }
}

async fn logout(req: HttpRequest, recorder: web::Data<Recorder>) -> HttpResponse {
    recorder.record(&req, None);
    HttpResponse::NoContent().finish()
}

async fn recover(req: HttpRequest, recorder: web::Data<Recorder>, body: web::Json<Value>) -> HttpResponse {
    recorder.record(&req, Some(&body.0));
    HttpResponse::Ok().json(json!({}))
}

async fn profiles(req: HttpRequest, recorder: web::Data<Recorder>, body: web::Json<Value>) -> HttpResponse {
    recorder.record(&req, Some(&body.0));
    HttpResponse::Created().finish()
}

fn workout_row(id: &str, title: &str) -> Value {
    json!({
        "id": id,
        "user_id": "user-1",
        "title": title,
        "notes": null,
        "duration_minutes": 45,
        "calories_burned": 320,
        "started_at": "2024-05-01T07:30:00+00:00",
        "completed_at": null,
        "created_at": "2024-05-01T08:15:00.123456+00:00"
    })
}

async fn list_workouts(req: HttpRequest, recorder: web::Data<Recorder>) -> HttpResponse {
    recorder.record(&req, None);
    HttpResponse::Ok().json(json!([workout_row("w2", "Intervals"), workout_row("w1", "Leg day")]))
}

async fn create_workout(req: HttpRequest, recorder: web::Data<Recorder>, body: web::Json<Value>) -> HttpResponse {
    recorder.record(&req, Some(&body.0));
    let title = body[0]["title"].as_str().unwrap_or_default();
    if title.is_empty() {
        return HttpResponse::Created().json(json!([]));
    }
    HttpResponse::Created().json(json!([workout_row("w3", title)]))
}

async fn plain_text(req: HttpRequest, recorder: web::Data<Recorder>) -> HttpResponse {
    recorder.record(&req, None);
    HttpResponse::Ok().content_type("text/plain").body("pong")
}

async fn broken(req: HttpRequest, recorder: web::Data<Recorder>) -> HttpResponse {
    recorder.record(&req, None);
    HttpResponse::InternalServerError().finish()
}

fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/auth/v1/token", web::post().to(token))
        .route("/auth/v1/signup", web::post().to(signup))
        .route("/auth/v1/user", web::get().to(user))
        .route("/auth/v1/logout", web::post().to(logout))
        .route("/auth/v1/recover", web::post().to(recover))
        .route("/rest/v1/profiles", web::post().to(profiles))
        .service(
            web::resource("/rest/v1/workout_sessions")
                .route(web::get().to(list_workouts))
                .route(web::post().to(create_workout)),
        )
        .route("/ping", web::get().to(plain_text))
        .route("/broken", web::get().to(broken));
}

/// Start the mock backend on an ephemeral port and return its base URL
pub async fn start_backend() -> (String, Recorder) {
    let recorder = Recorder::default();
    let data = web::Data::new(recorder.clone());

    let server = HttpServer::new(move || App::new().app_data(data.clone()).configure(routes))
        .workers(1)
        .disable_signals()
        .bind(("127.0.0.1", 0))
        .expect("bind mock backend");
    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());

    (format!("http://{addr}"), recorder)
}

/// Settings pointing at the mock backend, storing sessions under `storage_dir`
pub fn settings_for(base_url: &str, storage_dir: &std::path::Path) -> TrainerSettings {
    let mut settings = TrainerSettings::default();
    settings.backend.url = base_url.to_string();
    settings.backend.api_key = API_KEY.to_string();
    settings.storage.directory = storage_dir.display().to_string();
    settings
}
