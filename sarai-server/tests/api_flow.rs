//! End-to-end API tests over the full router (in-memory SQLite).

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::{Value, json};
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

use sarai_server::auth::{Claims, JwtConfig, JwtService};
use sarai_server::{Config, ServerState, api};
use shared::models::Role;

const SECRET: &str = "integration-test-secret-0123456789ab";

fn jwt_config() -> JwtConfig {
    JwtConfig {
        secret: SECRET.to_string(),
        issuer: "sarai-auth".to_string(),
        audience: "sarai-api".to_string(),
    }
}

fn test_config() -> Config {
    Config {
        work_dir: std::env::temp_dir().to_string_lossy().into_owned(),
        http_port: 0,
        database_path: None,
        jwt: jwt_config(),
        environment: "test".to_string(),
        cors_origins: "*".to_string(),
    }
}

async fn test_app() -> Router {
    test_app_with_pool().await.0
}

async fn test_app_with_pool() -> (Router, sqlx::SqlitePool) {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    sqlx::migrate!("./migrations").run(&pool).await.unwrap();

    // seed the user directory (provisioned by the identity service in prod)
    sqlx::query(
        "INSERT INTO user (id, email, name, role) VALUES \
         (1, 'admin@sarai.example', 'Admin', 'SUPER_ADMIN'), \
         (2, 'staff@sarai.example', 'Meera', 'STAFF'), \
         (7, 'asha@sarai.example', 'Asha', 'GUEST')",
    )
    .execute(&pool)
    .await
    .unwrap();

    let state = ServerState::new(
        test_config(),
        pool.clone(),
        Arc::new(JwtService::with_config(jwt_config())),
    );
    (api::build_router(state), pool)
}

fn token(id: i64, name: &str, role: Role) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: id.to_string(),
        name: name.to_string(),
        role,
        exp: now + 3600,
        iat: now,
        iss: "sarai-auth".to_string(),
        aud: "sarai-api".to_string(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

fn admin_token() -> String {
    token(1, "Admin", Role::SuperAdmin)
}

fn staff_token() -> String {
    token(2, "Meera", Role::Staff)
}

fn guest_token() -> String {
    token(7, "Asha", Role::Guest)
}

async fn send(
    app: &Router,
    method: &str,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(t) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

fn room_payload(number: &str) -> Value {
    json!({
        "room_number": number,
        "floor": 3,
        "room_type": "SARJU",
        "beds": [{"type": "DOUBLE", "quantity": 1}],
        "has_geyser": true,
        "has_ac": true,
        "is_visible": true,
        "building": "Shree Hari"
    })
}

/// Millis for midnight UTC, `offset_days` from today.
fn day_millis(offset_days: i64) -> i64 {
    let date = chrono::Utc::now().date_naive() + chrono::Days::new(offset_days.unsigned_abs());
    date.and_hms_opt(0, 0, 0)
        .unwrap()
        .and_utc()
        .timestamp_millis()
}

#[tokio::test]
async fn test_health_is_public() {
    let app = test_app().await;
    let (status, body) = send(&app, "GET", "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_auth_is_enforced() {
    let app = test_app().await;

    let (status, _) = send(&app, "GET", "/api/rooms", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // guest cannot hit staff routes
    let (status, _) = send(
        &app,
        "POST",
        "/api/rooms",
        Some(&guest_token()),
        Some(room_payload("301")),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // staff cannot hit super-admin routes
    let (status, _) = send(
        &app,
        "POST",
        "/api/categories/dining-halls",
        Some(&staff_token()),
        Some(json!({"building_name": "Annapurna", "color_code": "#FF6B35"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_guests_only_see_visible_rooms() {
    let app = test_app().await;
    let staff = staff_token();

    let (status, _) = send(&app, "POST", "/api/rooms", Some(&staff), Some(room_payload("301"))).await;
    assert_eq!(status, StatusCode::OK);

    let mut hidden = room_payload("302");
    hidden["is_visible"] = json!(false);
    let (status, _) = send(&app, "POST", "/api/rooms", Some(&staff), Some(hidden)).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, "GET", "/api/rooms", Some(&guest_token()), None).await;
    let rooms = body["data"].as_array().unwrap();
    assert_eq!(rooms.len(), 1);
    assert_eq!(rooms[0]["room_number"], "301");

    let (_, body) = send(&app, "GET", "/api/rooms", Some(&staff), None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_room_stats_and_floors_open_to_guests() {
    let app = test_app().await;
    let staff = staff_token();
    let guest = guest_token();

    send(&app, "POST", "/api/rooms", Some(&staff), Some(room_payload("301"))).await;

    let (status, body) = send(&app, "GET", "/api/rooms/stats", Some(&guest), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_rooms"], 1);
    assert_eq!(body["data"]["available_rooms"], 1);

    let (status, body) = send(
        &app,
        "GET",
        "/api/rooms/floors?building=Shree%20Hari",
        Some(&guest),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([3]));
}

#[tokio::test]
async fn test_duplicate_room_number_in_building_rejected() {
    let app = test_app().await;
    let staff = staff_token();

    send(&app, "POST", "/api/rooms", Some(&staff), Some(room_payload("301"))).await;
    let (status, body) =
        send(&app, "POST", "/api/rooms", Some(&staff), Some(room_payload("301"))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 3002);
}

#[tokio::test]
async fn test_request_lifecycle_approval_assigns_room() {
    let app = test_app().await;
    let staff = staff_token();
    let guest = guest_token();

    let (_, body) = send(&app, "POST", "/api/rooms", Some(&staff), Some(room_payload("301"))).await;
    let room_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        "POST",
        "/api/room-requests",
        Some(&guest),
        Some(json!({
            "check_in_date": day_millis(0),
            "check_out_date": day_millis(2),
            "number_of_people": {"male": 1, "female": 1, "children": 0},
            "purpose": "Darshan",
            "place": "Rajkot"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let request_id = body["data"]["id"].as_i64().unwrap();
    assert_eq!(body["data"]["number_of_people"]["total"], 2);
    assert_eq!(body["data"]["status"], "PENDING");

    // guest sees only their own requests
    let (_, body) = send(&app, "GET", "/api/room-requests", Some(&guest), None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/room-requests/{request_id}/process"),
        Some(&staff),
        Some(json!({"status": "APPROVED", "room_id": room_id})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["request"]["status"], "APPROVED");
    assert_eq!(body["data"]["assignment"]["room_id"].as_i64(), Some(room_id));
    assert!(body["data"]["warning"].is_null());

    // a second decision on the same request is refused
    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/room-requests/{request_id}/process"),
        Some(&staff),
        Some(json!({"status": "REJECTED"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 4003);

    // the room is now occupied
    let (_, body) = send(&app, "GET", "/api/rooms/stats", Some(&staff), None).await;
    assert_eq!(body["data"]["occupied_rooms"], 1);
}

#[tokio::test]
async fn test_request_views_carry_guest_and_room_details() {
    let (app, pool) = test_app_with_pool().await;
    let staff = staff_token();
    let guest = guest_token();

    let (_, body) = send(&app, "POST", "/api/rooms", Some(&staff), Some(room_payload("301"))).await;
    let room_id = body["data"]["id"].as_i64().unwrap();

    let (_, body) = send(
        &app,
        "POST",
        "/api/room-requests",
        Some(&guest),
        Some(json!({
            "check_in_date": day_millis(0),
            "check_out_date": day_millis(2),
            "number_of_people": {"male": 1, "female": 1, "children": 0},
            "purpose": "Darshan",
            "place": "Rajkot"
        })),
    )
    .await;
    let request_id = body["data"]["id"].as_i64().unwrap();

    // before a decision: guest profile resolved, no assignment yet
    let (_, body) = send(
        &app,
        "GET",
        &format!("/api/room-requests/{request_id}"),
        Some(&staff),
        None,
    )
    .await;
    assert_eq!(body["data"]["request"]["status"], "PENDING");
    assert_eq!(body["data"]["user"]["name"], "Asha");
    assert!(body["data"]["assignment"].is_null());
    assert!(body["data"]["room"].is_null());

    send(
        &app,
        "PUT",
        &format!("/api/room-requests/{request_id}/process"),
        Some(&staff),
        Some(json!({"status": "APPROVED", "room_id": room_id})),
    )
    .await;

    // after approval the list carries the assignment and its room
    let (status, body) = send(&app, "GET", "/api/room-requests", Some(&staff), None).await;
    assert_eq!(status, StatusCode::OK);
    let entry = &body["data"].as_array().unwrap()[0];
    assert_eq!(entry["request"]["status"], "APPROVED");
    assert_eq!(entry["user"]["name"], "Asha");
    assert_eq!(entry["assignment"]["room_id"].as_i64(), Some(room_id));
    assert_eq!(entry["room"]["room_number"], "301");

    // a broken directory degrades the view instead of failing it
    sqlx::query("DROP TABLE user").execute(&pool).await.unwrap();
    let (status, body) = send(&app, "GET", "/api/room-requests", Some(&staff), None).await;
    assert_eq!(status, StatusCode::OK);
    let entry = &body["data"].as_array().unwrap()[0];
    assert!(entry["user"].is_null());
    assert_eq!(entry["room"]["room_number"], "301");
}

#[tokio::test]
async fn test_ledger_list_survives_profile_lookup_failure() {
    let (app, pool) = test_app_with_pool().await;
    let staff = staff_token();

    let (_, body) = send(&app, "POST", "/api/rooms", Some(&staff), Some(room_payload("301"))).await;
    let room_id = body["data"]["id"].as_i64().unwrap();

    let (status, _) = send(
        &app,
        "POST",
        "/api/room-assignments",
        Some(&staff),
        Some(json!({
            "room_id": room_id,
            "user_id": 7,
            "request_id": 0,
            "check_in_date": day_millis(0),
            "check_out_date": day_millis(1),
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    sqlx::query("DROP TABLE user").execute(&pool).await.unwrap();

    let (status, body) = send(&app, "GET", "/api/room-assignments", Some(&staff), None).await;
    assert_eq!(status, StatusCode::OK);
    let entry = &body["data"].as_array().unwrap()[0];
    assert!(entry["user"].is_null());
    assert_eq!(entry["assignment"]["room_id"].as_i64(), Some(room_id));
}

#[tokio::test]
async fn test_withdraw_only_own_pending_request() {
    let app = test_app().await;
    let guest = guest_token();
    let other = token(8, "Ravi", Role::Guest);

    let (_, body) = send(
        &app,
        "POST",
        "/api/room-requests",
        Some(&guest),
        Some(json!({
            "check_in_date": day_millis(0),
            "check_out_date": day_millis(1),
            "number_of_people": {"male": 1, "female": 0, "children": 0},
            "purpose": "Darshan",
            "place": "Surat"
        })),
    )
    .await;
    let request_id = body["data"]["id"].as_i64().unwrap();

    // another guest cannot even see it
    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/room-requests/{request_id}"),
        Some(&other),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/room-requests/{request_id}"),
        Some(&guest),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_stay_flow_passes_issued_and_revoked() {
    let app = test_app().await;
    let admin = admin_token();
    let staff = staff_token();
    let guest = guest_token();

    let (_, body) = send(&app, "POST", "/api/rooms", Some(&staff), Some(room_payload("301"))).await;
    let room_id = body["data"]["id"].as_i64().unwrap();

    let (status, _) = send(
        &app,
        "POST",
        "/api/categories/dining-halls",
        Some(&admin),
        Some(json!({"building_name": "Annapurna", "color_code": "#FF6B35"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // direct assignment: two family members, three calendar days
    let (status, body) = send(
        &app,
        "POST",
        "/api/room-assignments",
        Some(&staff),
        Some(json!({
            "room_id": room_id,
            "user_id": 7,
            "request_id": 0,
            "check_in_date": day_millis(0),
            "check_out_date": day_millis(2),
            "guest_names": ["Asha", "Ravi"],
            "dining_hall_preference": "Annapurna"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let assignment_id = body["data"]["id"].as_i64().unwrap();

    // the room cannot be double-assigned
    let (status, body) = send(
        &app,
        "POST",
        "/api/room-assignments",
        Some(&staff),
        Some(json!({
            "room_id": room_id,
            "user_id": 8,
            "request_id": 0,
            "check_in_date": day_millis(0),
            "check_out_date": day_millis(1),
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 3003);

    // check-in issues 2 members x 3 meals x 3 days = 18 passes
    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/room-assignments/{assignment_id}/check-in"),
        Some(&staff),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["passes_issued"], 18);
    assert!(body["data"]["warning"].is_null());

    // double check-in is refused
    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/room-assignments/{assignment_id}/check-in"),
        Some(&staff),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 5002);

    // the guest can see their own passes, with the hall color resolved
    let (status, body) = send(&app, "GET", "/api/food-passes/user/7", Some(&guest), None).await;
    assert_eq!(status, StatusCode::OK);
    let passes = body["data"].as_array().unwrap();
    assert_eq!(passes.len(), 18);
    assert!(passes.iter().all(|p| p["color_code"] == "#FF6B35"));
    let pass_id = passes[0]["id"].as_i64().unwrap();

    // another guest cannot
    let (status, _) = send(
        &app,
        "GET",
        "/api/food-passes/user/7",
        Some(&token(8, "Ravi", Role::Guest)),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // first scan succeeds, second is refused with the opaque error
    let (status, body) = send(
        &app,
        "POST",
        "/api/food-passes/scan",
        Some(&staff),
        Some(json!({"pass_id": pass_id})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["is_used"], true);

    let (status, body) = send(
        &app,
        "POST",
        "/api/food-passes/scan",
        Some(&staff),
        Some(json!({"pass_id": pass_id})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 6001);

    // check-out frees the room and revokes the 17 unused passes
    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/room-assignments/{assignment_id}/check-out"),
        Some(&staff),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["passes_revoked"], 17);

    let (_, body) = send(&app, "GET", "/api/food-passes/user/7", Some(&guest), None).await;
    let remaining = body["data"].as_array().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0]["is_used"], true);

    let (_, body) = send(&app, "GET", "/api/rooms/stats", Some(&staff), None).await;
    assert_eq!(body["data"]["occupied_rooms"], 0);
    assert_eq!(body["data"]["available_rooms"], 1);
}

#[tokio::test]
async fn test_scan_requires_staff() {
    let app = test_app().await;
    let (status, _) = send(
        &app,
        "POST",
        "/api/food-passes/scan",
        Some(&guest_token()),
        Some(json!({"pass_id": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_catalog_crud_super_admin() {
    let app = test_app().await;
    let admin = admin_token();

    let (status, body) = send(
        &app,
        "POST",
        "/api/categories/rooms",
        Some(&admin),
        Some(json!({"room_name": "Shree Hari Plus", "price": "₹1500/night"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/categories/rooms/{id}"),
        Some(&admin),
        Some(json!({"price": "₹1800/night"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["price"], "₹1800/night");

    // the catalog is back-office config; even reads stay super-admin
    let (status, _) = send(
        &app,
        "GET",
        "/api/categories/rooms",
        Some(&guest_token()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&app, "GET", "/api/categories/rooms", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/categories/rooms/{id}"),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // bad color codes are rejected
    let (status, body) = send(
        &app,
        "POST",
        "/api/categories/dining-halls",
        Some(&admin),
        Some(json!({"building_name": "Gokul", "color_code": "red"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 6102);
}
