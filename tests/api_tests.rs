use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use crewline::config::Config;
use http_body_util::BodyExt;
use tower::ServiceExt;

/// Default API key seeded by migration (must match m20250301_initial.rs)
const DEFAULT_API_KEY: &str = "crewline_default_api_key_please_regenerate";

async fn spawn_app() -> Router {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    // A single pooled connection keeps every request on the same in-memory db.
    config.general.max_db_connections = 1;
    config.general.min_db_connections = 1;

    let state = crewline::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");
    crewline::api::router(state).await
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("X-Api-Key", DEFAULT_API_KEY)
        .body(Body::empty())
        .unwrap()
}

fn send(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("X-Api-Key", DEFAULT_API_KEY)
        .header("Content-Type", mime::APPLICATION_JSON.as_ref())
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

async fn json_body(response: axum::http::Response<axum::body::Body>) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_auth_endpoints() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/trips")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/trips")
                .header("X-Api-Key", "wrong-key")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app.clone().oneshot(get("/api/trips")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_health_is_public() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["db_connected"], true);
}

#[tokio::test]
async fn test_login_flow() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({
                        "email": "admin@crewline.local",
                        "password": "password"
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["email"], "admin@crewline.local");
    assert_eq!(body["data"]["api_key"], DEFAULT_API_KEY);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({
                        "email": "admin@crewline.local",
                        "password": "not-the-password"
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_user_crud() {
    let app = spawn_app().await;

    let new_user = serde_json::json!({
        "email": "deckhand@crewline.local",
        "password": "seaworthy1",
        "first_name": "Dee",
        "last_name": "Hand",
        "home_location": "Ogle"
    });

    let response = app
        .clone()
        .oneshot(send("POST", "/api/users", new_user.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = json_body(response).await;
    assert_eq!(body["data"]["email"], "deckhand@crewline.local");
    assert_eq!(body["data"]["is_verified"], false);
    // The password hash must never appear in any outward representation.
    assert!(body["data"].get("password_hash").is_none());
    assert!(body["data"].get("password").is_none());

    let response = app
        .clone()
        .oneshot(send("POST", "/api/users", new_user))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .clone()
        .oneshot(send(
            "POST",
            "/api/users/deckhand@crewline.local/verify",
            serde_json::json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["is_verified"], true);

    let response = app
        .clone()
        .oneshot(send(
            "PUT",
            "/api/users/deckhand@crewline.local",
            serde_json::json!({ "home_location": "NTM" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["home_location"], "NTM");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/users/deckhand@crewline.local")
                .header("X-Api-Key", DEFAULT_API_KEY)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get("/api/users/deckhand@crewline.local"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

async fn create_passenger(app: &Router, first: &str, last: &str) -> i32 {
    let response = app
        .clone()
        .oneshot(send(
            "POST",
            "/api/passengers",
            serde_json::json!({
                "first_name": first,
                "last_name": last,
                "job_role": "Roustabout"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = json_body(response).await;
    body["data"]["id"].as_i64().unwrap() as i32
}

async fn create_trip(app: &Router, passenger_id: i32, count: Option<i32>) -> i32 {
    let response = app
        .clone()
        .oneshot(send(
            "POST",
            "/api/trips",
            serde_json::json!({
                "passenger_id": passenger_id,
                "origin": "Ogle",
                "destination": "NTM",
                "trip_date": "2025-04-02",
                "number_of_passengers": count
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = json_body(response).await;
    body["data"]["id"].as_i64().unwrap() as i32
}

#[tokio::test]
async fn test_passenger_cascade_delete() {
    let app = spawn_app().await;

    let passenger_id = create_passenger(&app, "Cass", "Kade").await;
    let mut trip_ids = Vec::new();
    for _ in 0..3 {
        trip_ids.push(create_trip(&app, passenger_id, None).await);
    }

    // Another passenger's trip must survive the cascade.
    let other_passenger = create_passenger(&app, "Una", "Ffected").await;
    let other_trip = create_trip(&app, other_passenger, None).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/passengers/{passenger_id}"))
                .header("X-Api-Key", DEFAULT_API_KEY)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["data"]["trips_deleted"], 3);

    for trip_id in trip_ids {
        let response = app
            .clone()
            .oneshot(get(&format!("/api/trips/{trip_id}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    let response = app
        .clone()
        .oneshot(get(&format!("/api/passengers/{passenger_id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(get(&format!("/api/trips/{other_trip}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_delete_passenger_rejects_malformed_id() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/passengers/not-a-number")
                .header("X-Api-Key", DEFAULT_API_KEY)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/passengers/9999")
                .header("X-Api-Key", DEFAULT_API_KEY)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_trip_passenger_counters() {
    let app = spawn_app().await;

    let passenger_id = create_passenger(&app, "Conn", "Tour").await;
    let trip_id = create_trip(&app, passenger_id, Some(2)).await;

    let response = app
        .clone()
        .oneshot(send(
            "PATCH",
            &format!("/api/trips/{trip_id}/passengers/increment"),
            serde_json::json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["number_of_passengers"], 3);

    let response = app
        .clone()
        .oneshot(send(
            "PATCH",
            &format!("/api/trips/{trip_id}/passengers/decrement"),
            serde_json::json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["number_of_passengers"], 2);

    // set rejects non-positive values
    let response = app
        .clone()
        .oneshot(send(
            "PATCH",
            &format!("/api/trips/{trip_id}/passengers/set"),
            serde_json::json!({ "value": 0 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(send(
            "PATCH",
            &format!("/api/trips/{trip_id}/passengers/set"),
            serde_json::json!({ "value": 1 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // decrement refuses to go below the floor of 1
    let response = app
        .clone()
        .oneshot(send(
            "PATCH",
            &format!("/api/trips/{trip_id}/passengers/decrement"),
            serde_json::json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(get(&format!("/api/trips/{trip_id}")))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["data"]["number_of_passengers"], 1);

    // counter ops on a missing trip are 404
    let response = app
        .clone()
        .oneshot(send(
            "PATCH",
            "/api/trips/9999/passengers/increment",
            serde_json::json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_trip_confirm_is_one_way() {
    let app = spawn_app().await;

    let passenger_id = create_passenger(&app, "Conf", "Irmed").await;
    let trip_id = create_trip(&app, passenger_id, None).await;

    let response = app
        .clone()
        .oneshot(send(
            "POST",
            &format!("/api/trips/{trip_id}/confirm"),
            serde_json::json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["confirmed"], true);

    // confirming again is a no-op, not an error
    let response = app
        .clone()
        .oneshot(send(
            "POST",
            &format!("/api/trips/{trip_id}/confirm"),
            serde_json::json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["confirmed"], true);
}

#[tokio::test]
async fn test_trips_by_passenger() {
    let app = spawn_app().await;

    let passenger_id = create_passenger(&app, "Multi", "Trip").await;
    create_trip(&app, passenger_id, None).await;
    create_trip(&app, passenger_id, None).await;

    let response = app
        .clone()
        .oneshot(get(&format!("/api/trips/passenger/{passenger_id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let response = app
        .clone()
        .oneshot(get("/api/trips/passenger/9999"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_sites_initialize_and_pob() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(send("POST", "/api/sites/initialize", serde_json::json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = json_body(response).await;
    let sites = body["data"].as_array().unwrap();
    assert_eq!(sites.len(), 6);
    for site in sites {
        assert_eq!(site["current_pob"], 0);
        assert_eq!(site["maximum_pob"], 200);
    }

    // idempotent: a second call yields the same six sites, untouched
    let response = app
        .clone()
        .oneshot(send("POST", "/api/sites/initialize", serde_json::json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 6);

    let response = app
        .clone()
        .oneshot(send(
            "PUT",
            "/api/sites/Ogle/pob",
            serde_json::json!({ "current_pob": 42 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["current_pob"], 42);

    let response = app
        .clone()
        .oneshot(send(
            "PUT",
            "/api/sites/Ogle/pob",
            serde_json::json!({ "current_pob": -1 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // an unknown site is created on first POB update
    let response = app
        .clone()
        .oneshot(send(
            "PUT",
            "/api/sites/Wharf/pob",
            serde_json::json!({ "current_pob": 7 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["current_pob"], 7);
    assert_eq!(body["data"]["maximum_pob"], 200);

    let response = app.clone().oneshot(get("/api/sites")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["site_name"].as_str().unwrap())
        .collect();
    let mut sorted = names.clone();
    sorted.sort_unstable();
    assert_eq!(names, sorted);
    assert_eq!(names.len(), 7);
}

#[tokio::test]
async fn test_sort_order_is_per_user() {
    let app = spawn_app().await;

    let passenger_id = create_passenger(&app, "Sortable", "Trip").await;
    let trip_id = create_trip(&app, passenger_id, None).await;

    let response = app
        .clone()
        .oneshot(send(
            "PUT",
            &format!("/api/trips/{trip_id}/sort-order"),
            serde_json::json!({ "position": 4 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["sort_order"]["admin@crewline.local"], 4);
}
