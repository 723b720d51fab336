//! Full portal flow against a real Postgres. Runs only when DATABASE_URL is
//! set; without it the test prints a note and exits early.

use std::env;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;

const BOUNDARY: &str = "karirportalboundary";

fn multipart_text(body: &mut Vec<u8>, name: &str, value: &str) {
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        )
        .as_bytes(),
    );
}

fn multipart_file(body: &mut Vec<u8>, name: &str, filename: &str, content_type: &str, data: &[u8]) {
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(b"\r\n");
}

fn intake_request(nik: &str, position_id: &str) -> Request<Body> {
    let mut body = Vec::new();
    multipart_text(&mut body, "nik", nik);
    multipart_text(&mut body, "fullName", "Budi Santoso");
    multipart_text(&mut body, "email", &format!("budi+{nik}@contoh.id"));
    multipart_text(&mut body, "phone", "081234567890");
    multipart_text(&mut body, "whatsapp", "081234567890");
    multipart_text(&mut body, "address", "Jl. Merdeka 10, Bandung");
    multipart_text(&mut body, "education", "S1 Teknik Informatika");
    multipart_text(&mut body, "positionId", position_id);
    multipart_file(&mut body, "cv", "cv.pdf", "application/pdf", b"%PDF-1.4 cv");
    multipart_file(&mut body, "photo3x4", "foto.png", "image/png", b"\x89PNG foto");
    multipart_file(&mut body, "ktp", "ktp.pdf", "application/pdf", b"%PDF-1.4 ktp");
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/applications")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn router(app_state: karir_backend::AppState) -> Router {
    let public_api = Router::new()
        .route(
            "/api/applications",
            post(karir_backend::routes::application_routes::submit_application),
        )
        .route(
            "/api/positions/open",
            get(karir_backend::routes::position_routes::open_positions),
        )
        .route(
            "/api/auth/login",
            post(karir_backend::routes::auth_routes::login),
        );

    let admin_api = Router::new()
        .route(
            "/api/admin/account",
            axum::routing::patch(karir_backend::routes::auth_routes::change_password),
        )
        .route(
            "/api/admin/applications",
            get(karir_backend::routes::application_routes::list_applications),
        )
        .route(
            "/api/admin/applications/status",
            post(karir_backend::routes::application_routes::update_application_status),
        )
        .route(
            "/api/admin/applications/:id/whatsapp-message",
            get(karir_backend::routes::application_routes::whatsapp_message),
        )
        .route(
            "/api/admin/interviews",
            post(karir_backend::routes::interview_routes::schedule_interview),
        )
        .route(
            "/api/admin/positions",
            get(karir_backend::routes::position_routes::list_positions)
                .post(karir_backend::routes::position_routes::create_position),
        )
        .route(
            "/api/admin/positions/:id",
            get(karir_backend::routes::position_routes::get_position)
                .put(karir_backend::routes::position_routes::update_position)
                .delete(karir_backend::routes::position_routes::delete_position),
        )
        .layer(axum::middleware::from_fn(
            karir_backend::middleware::auth::require_admin_auth,
        ));

    Router::new()
        .route("/health", get(karir_backend::routes::health::health))
        .merge(public_api)
        .merge(admin_api)
        .with_state(app_state)
}

async fn body_json(resp: axum::response::Response) -> JsonValue {
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn authed(req: axum::http::request::Builder, token: &str) -> axum::http::request::Builder {
    req.header("authorization", format!("Bearer {}", token))
}

#[tokio::test]
async fn portal_api_end_to_end() {
    dotenvy::dotenv().ok();
    if env::var("DATABASE_URL").is_err() {
        eprintln!("skipping portal_api_end_to_end: DATABASE_URL is not set");
        return;
    }

    let run_tag = chrono::Utc::now().timestamp_millis();
    let seed_email = format!("hr+{run_tag}@jagonet.id");
    let uploads_root = tempfile::tempdir().expect("tempdir");

    env::set_var("SERVER_ADDRESS", "127.0.0.1:0");
    env::set_var("JWT_SECRET", "test_secret_key");
    env::set_var("PUBLIC_RPS", "1000");
    env::set_var("ADMIN_RPS", "1000");
    env::set_var("UPLOADS_DIR", uploads_root.path());
    env::set_var("SEED_ADMIN_EMAIL", &seed_email);
    env::set_var("SEED_ADMIN_PASSWORD", "rahasia-hr");
    env::set_var("SEED_ADMIN_NAME", "HR Jagonet");
    // The outbox assertions below expect unconfigured gateways.
    env::remove_var("WHATSAPP_API_URL");
    env::remove_var("WHATSAPP_API_TOKEN");
    env::remove_var("EMAIL_API_URL");
    env::remove_var("EMAIL_API_TOKEN");
    karir_backend::config::init_config().expect("init config");

    let pool = karir_backend::database::pool::create_pool()
        .await
        .expect("pool");
    sqlx::migrate!("./migrations").run(&pool).await.expect("migrations");

    let app_state = karir_backend::AppState::new(pool.clone());
    app_state
        .admin_service
        .ensure_seed_admin()
        .await
        .expect("seed admin");

    let app = router(app_state.clone());

    // Login rejects a wrong password, accepts the seeded one.
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({"email": seed_email, "password": "salah"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(resp).await;
    assert_eq!(body["error"], "Email atau password salah");

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({"email": seed_email, "password": "rahasia-hr"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["message"], "Login berhasil");
    assert_eq!(body["admin"]["name"], "HR Jagonet");
    let token = body["token"].as_str().expect("token").to_string();

    // Create a position and see it on both listings.
    let resp = app
        .clone()
        .oneshot(
            authed(
                Request::builder()
                    .method("POST")
                    .uri("/api/admin/positions")
                    .header("content-type", "application/json"),
                &token,
            )
            .body(Body::from(
                json!({
                    "title": format!("Teknisi Jaringan {run_tag}"),
                    "description": "Instalasi dan maintenance jaringan pelanggan",
                    "requirements": "MTCNA, siap kerja lapangan",
                    "location": "Bandung",
                    "type": "FULL_TIME"
                })
                .to_string(),
            ))
            .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["message"], "Posisi berhasil dibuat");
    assert_eq!(body["position"]["isOpen"], true);
    assert_eq!(body["position"]["type"], "FULL_TIME");
    let position_id = body["position"]["id"].as_str().expect("id").to_string();
    let position_title = body["position"]["title"].as_str().unwrap().to_string();

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/positions/open")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert!(body["positions"]
        .as_array()
        .unwrap()
        .iter()
        .any(|p| p["id"] == position_id.as_str()));

    let resp = app
        .clone()
        .oneshot(
            authed(Request::builder().uri("/api/admin/positions"), &token)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    let row = body["positions"]
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["id"] == position_id.as_str())
        .expect("created position listed")
        .clone();
    assert_eq!(row["applicationCount"], 0);

    // Submit an application and check the two-phase file landing.
    let nik = format!("{:016}", run_tag);
    let resp = app
        .clone()
        .oneshot(intake_request(&nik, &position_id))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["message"], "Lamaran berhasil dikirim");
    assert_eq!(body["application"]["status"], "PENDING");
    assert_eq!(body["application"]["ktpVerified"], true);
    assert_eq!(body["application"]["position"]["title"], position_title);
    assert_eq!(body["ktpValidation"]["isValid"], true);
    assert_eq!(body["ktpValidation"]["confidence"], 100);
    let application_id = body["application"]["id"].as_str().expect("id").to_string();
    let cv_url = body["application"]["cvUrl"].as_str().unwrap().to_string();
    assert!(cv_url.starts_with("/uploads/cv/"));

    let cv_name = cv_url.trim_start_matches("/uploads/cv/");
    assert!(uploads_root.path().join("cv").join(cv_name).exists());
    let staged: Vec<_> = match std::fs::read_dir(uploads_root.path().join("staging")) {
        Ok(entries) => entries.collect(),
        Err(_) => Vec::new(),
    };
    assert!(staged.is_empty(), "staging area should be drained");

    // A second submission with the same NIK is blocked while the first one
    // is active.
    let resp = app
        .clone()
        .oneshot(intake_request(&nik, &position_id))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(
        body["error"],
        format!("NIK {nik} sudah memiliki lamaran aktif (PENDING) untuk posisi {position_title}")
    );

    // Listing carries the position and a null interview schedule.
    let resp = app
        .clone()
        .oneshot(
            authed(Request::builder().uri("/api/admin/applications"), &token)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    let row = body["applications"]
        .as_array()
        .unwrap()
        .iter()
        .find(|a| a["id"] == application_id.as_str())
        .expect("application listed")
        .clone();
    assert_eq!(row["position"]["title"], position_title);
    assert!(row["interviewSchedule"].is_null());

    let resp = app
        .clone()
        .oneshot(
            authed(
                Request::builder().uri("/api/admin/applications?status=ACCEPTED"),
                &token,
            )
            .body(Body::empty())
            .unwrap(),
        )
        .await
        .unwrap();
    let body = body_json(resp).await;
    assert!(!body["applications"]
        .as_array()
        .unwrap()
        .iter()
        .any(|a| a["id"] == application_id.as_str()));

    // PENDING cannot jump straight to INTERVIEWED.
    let resp = app
        .clone()
        .oneshot(
            authed(
                Request::builder()
                    .method("POST")
                    .uri("/api/admin/applications/status")
                    .header("content-type", "application/json"),
                &token,
            )
            .body(Body::from(
                json!({"applicationId": application_id, "status": "INTERVIEWED"}).to_string(),
            ))
            .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(
        body["error"],
        "Status tidak dapat diubah dari PENDING ke INTERVIEWED"
    );

    // Schedule the interview; the status follows and the listing now carries
    // the schedule.
    let resp = app
        .clone()
        .oneshot(
            authed(
                Request::builder()
                    .method("POST")
                    .uri("/api/admin/interviews")
                    .header("content-type", "application/json"),
                &token,
            )
            .body(Body::from(
                json!({
                    "applicationId": application_id,
                    "scheduledDate": "2026-09-03T09:30",
                    "location": "Kantor Jagonet, Bandung",
                    "notes": "Bawa KTP asli"
                })
                .to_string(),
            ))
            .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["message"], "Jadwal interview berhasil dibuat");
    assert_eq!(body["interview"]["applicationId"], application_id.as_str());
    assert_eq!(body["interview"]["notes"], "Bawa KTP asli");
    let interview_id = body["interview"]["id"].as_str().unwrap().to_string();

    let resp = app
        .clone()
        .oneshot(
            authed(
                Request::builder().uri("/api/admin/applications?status=INTERVIEW_SCHEDULED"),
                &token,
            )
            .body(Body::empty())
            .unwrap(),
        )
        .await
        .unwrap();
    let body = body_json(resp).await;
    let row = body["applications"]
        .as_array()
        .unwrap()
        .iter()
        .find(|a| a["id"] == application_id.as_str())
        .expect("scheduled application listed")
        .clone();
    assert_eq!(row["status"], "INTERVIEW_SCHEDULED");
    assert_eq!(
        row["interviewSchedule"]["location"],
        "Kantor Jagonet, Bandung"
    );

    // The dashboard's manual WhatsApp flow.
    let resp = app
        .clone()
        .oneshot(
            authed(
                Request::builder().uri(format!(
                    "/api/admin/applications/{application_id}/whatsapp-message?kind=interview"
                )),
                &token,
            )
            .body(Body::empty())
            .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["phone"], "6281234567890");
    let message = body["message"].as_str().unwrap();
    assert!(message.contains(&position_title));
    assert!(message.contains("*Jadwal Interview:*"));
    assert!(message.contains("Bawa KTP asli"));
    assert!(body["url"]
        .as_str()
        .unwrap()
        .starts_with("https://wa.me/6281234567890?text="));

    // Re-scheduling overwrites the same interview row.
    let resp = app
        .clone()
        .oneshot(
            authed(
                Request::builder()
                    .method("POST")
                    .uri("/api/admin/interviews")
                    .header("content-type", "application/json"),
                &token,
            )
            .body(Body::from(
                json!({
                    "applicationId": application_id,
                    "scheduledDate": "2026-09-04T13:00",
                    "location": "Kantor Jagonet, Bandung (Lantai 2)"
                })
                .to_string(),
            ))
            .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["interview"]["id"], interview_id.as_str());
    assert_eq!(
        body["interview"]["location"],
        "Kantor Jagonet, Bandung (Lantai 2)"
    );
    assert!(body["interview"]["notes"].is_null());

    // Walk the workflow to ACCEPTED.
    for status in ["INTERVIEWED", "ACCEPTED"] {
        let resp = app
            .clone()
            .oneshot(
                authed(
                    Request::builder()
                        .method("POST")
                        .uri("/api/admin/applications/status")
                        .header("content-type", "application/json"),
                    &token,
                )
                .body(Body::from(
                    json!({"applicationId": application_id, "status": status}).to_string(),
                ))
                .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["message"], "Status lamaran berhasil diperbarui");
        assert_eq!(body["application"]["status"], status);
    }

    // Both schedulings and the acceptance each enqueued a whatsapp and an
    // email row; with no gateways configured the worker marks them skipped.
    let notifier =
        karir_backend::services::notification_service::NotificationService::new(pool.clone());
    while notifier.run_once().await.expect("outbox worker") {}

    let outbox: Vec<(String, String)> = sqlx::query_as::<_, (String, String)>(
        "SELECT channel, status FROM notification_outbox WHERE payload->>'applicationId' = $1",
    )
    .bind(&application_id)
    .fetch_all(&pool)
    .await
    .expect("outbox rows");
    assert_eq!(outbox.len(), 6);
    assert!(outbox.iter().all(|(_, status)| status == "skipped"));
    assert_eq!(
        outbox
            .iter()
            .filter(|(channel, _)| channel == "whatsapp")
            .count(),
        3
    );

    // A terminal application cannot be rescheduled.
    let resp = app
        .clone()
        .oneshot(
            authed(
                Request::builder()
                    .method("POST")
                    .uri("/api/admin/interviews")
                    .header("content-type", "application/json"),
                &token,
            )
            .body(Body::from(
                json!({
                    "applicationId": application_id,
                    "scheduledDate": "2026-09-10T10:00",
                    "location": "Kantor"
                })
                .to_string(),
            ))
            .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // A closed position rejects intake; deleting it needs no applications.
    let resp = app
        .clone()
        .oneshot(
            authed(
                Request::builder()
                    .method("POST")
                    .uri("/api/admin/positions")
                    .header("content-type", "application/json"),
                &token,
            )
            .body(Body::from(
                json!({
                    "title": format!("CS Magang {run_tag}"),
                    "description": "Customer service magang",
                    "requirements": "SMA/SMK",
                    "location": "Bandung",
                    "type": "INTERNSHIP",
                    "isOpen": true
                })
                .to_string(),
            ))
            .unwrap(),
        )
        .await
        .unwrap();
    let body = body_json(resp).await;
    let second_position = body["position"]["id"].as_str().unwrap().to_string();

    let resp = app
        .clone()
        .oneshot(
            authed(
                Request::builder()
                    .method("PUT")
                    .uri(format!("/api/admin/positions/{second_position}"))
                    .header("content-type", "application/json"),
                &token,
            )
            .body(Body::from(json!({"isOpen": false}).to_string()))
            .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["message"], "Posisi berhasil diupdate");
    assert_eq!(body["position"]["isOpen"], false);
    assert_eq!(body["position"]["title"], format!("CS Magang {run_tag}"));

    let closed_nik = format!("{:016}", run_tag + 1);
    let resp = app
        .clone()
        .oneshot(intake_request(&closed_nik, &second_position))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["error"], "Posisi sudah ditutup");

    let resp = app
        .clone()
        .oneshot(
            authed(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/admin/positions/{second_position}")),
                &token,
            )
            .body(Body::empty())
            .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["message"], "Posisi berhasil dihapus");

    let resp = app
        .clone()
        .oneshot(
            authed(
                Request::builder().uri(format!("/api/admin/positions/{second_position}")),
                &token,
            )
            .body(Body::empty())
            .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = body_json(resp).await;
    assert_eq!(body["error"], "Posisi tidak ditemukan");

    // A rejected application frees its NIK for a fresh submission.
    let rejected_nik = format!("{:016}", run_tag + 2);
    let resp = app
        .clone()
        .oneshot(intake_request(&rejected_nik, &position_id))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    let rejected_id = body["application"]["id"].as_str().unwrap().to_string();

    let resp = app
        .clone()
        .oneshot(
            authed(
                Request::builder()
                    .method("POST")
                    .uri("/api/admin/applications/status")
                    .header("content-type", "application/json"),
                &token,
            )
            .body(Body::from(
                json!({"applicationId": rejected_id, "status": "REJECTED"}).to_string(),
            ))
            .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .clone()
        .oneshot(intake_request(&rejected_nik, &position_id))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // Password change closes the loop on the account endpoint.
    let resp = app
        .clone()
        .oneshot(
            authed(
                Request::builder()
                    .method("PATCH")
                    .uri("/api/admin/account")
                    .header("content-type", "application/json"),
                &token,
            )
            .body(Body::from(
                json!({
                    "email": seed_email,
                    "oldPassword": "rahasia-hr",
                    "newPassword": "rahasia-baru"
                })
                .to_string(),
            ))
            .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(
        body["message"],
        "Perubahan berhasil disimpan. Silakan login ulang."
    );

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({"email": seed_email, "password": "rahasia-baru"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}
