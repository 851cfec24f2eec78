mod common;

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use metrics_exporter_prometheus::PrometheusBuilder;
use serde_json::{json, Value};

use hotel_booking::interfaces::http::{create_api_router, ApiState};

use common::*;

fn app(h: &TestHotel) -> Router {
    create_api_router(
        ApiState {
            engine: h.engine.clone(),
            reconciliation: h.reconciliation.clone(),
        },
        h.db.clone(),
        PrometheusBuilder::new().build_recorder().handle(),
    )
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Response<Body> {
    use tower::Service;
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let mut svc = app.clone().into_service();
    svc.call(req).await.unwrap()
}

async fn json_body(resp: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn booking_request(room_id: i32, check_in: &str, check_out: &str) -> Value {
    json!({
        "room_id": room_id,
        "name": "Rina",
        "phone": "081234567890",
        "check_in": check_in,
        "check_out": check_out,
        "guests": 2
    })
}

#[tokio::test]
async fn booking_lifecycle_over_http() {
    let h = hotel(jan(1)).await;
    let room = add_room(&h.db, h.deluxe, "101").await;
    let app = app(&h);

    let resp = send(
        &app,
        "POST",
        "/api/v1/bookings",
        Some(booking_request(room, "2024-01-10", "2024-01-12")),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = json_body(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["total_price"], 1_000_000);
    assert_eq!(body["data"]["bookings"][0]["status"], "pending");
    assert_eq!(body["data"]["bookings"][0]["total_nights"], 2);
    let id = body["data"]["bookings"][0]["id"].as_i64().unwrap();

    let resp = send(&app, "POST", &format!("/api/v1/bookings/{id}/confirm"), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["data"]["status"], "confirmed");

    // confirming twice is an invalid transition
    let resp = send(&app, "POST", &format!("/api/v1/bookings/{id}/confirm"), None).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert_eq!(json_body(resp).await["code"], "invalid_transition");

    let resp = send(&app, "GET", &format!("/api/v1/bookings/{id}"), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["data"]["room_id"], room);

    let resp = send(&app, "POST", &format!("/api/v1/bookings/{id}/cancel"), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["data"]["status"], "cancelled");
}

#[tokio::test]
async fn overlapping_confirm_is_409_date_conflict() {
    let h = hotel(jan(1)).await;
    let room = add_room(&h.db, h.deluxe, "101").await;
    let app = app(&h);

    let mut ids = Vec::new();
    for (a, b) in [("2024-01-10", "2024-01-12"), ("2024-01-11", "2024-01-13")] {
        let resp = send(&app, "POST", "/api/v1/bookings", Some(booking_request(room, a, b))).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        ids.push(json_body(resp).await["data"]["bookings"][0]["id"].as_i64().unwrap());
    }

    let resp = send(&app, "POST", &format!("/api/v1/bookings/{}/confirm", ids[0]), None).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = send(&app, "POST", &format!("/api/v1/bookings/{}/confirm", ids[1]), None).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body = json_body(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "date_conflict");
}

#[tokio::test]
async fn request_errors_map_to_client_statuses() {
    let h = hotel(jan(1)).await;
    let room = add_room(&h.db, h.deluxe, "101").await;
    let app = app(&h);

    // inverted range
    let resp = send(
        &app,
        "POST",
        "/api/v1/bookings",
        Some(booking_request(room, "2024-01-12", "2024-01-10")),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(resp).await["code"], "invalid_date_range");

    // no room reference
    let mut body = booking_request(room, "2024-01-10", "2024-01-12");
    body.as_object_mut().unwrap().remove("room_id");
    let resp = send(&app, "POST", "/api/v1/bookings", Some(body)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // field rules
    let mut body = booking_request(room, "2024-01-10", "2024-01-12");
    body["guests"] = json!(0);
    let resp = send(&app, "POST", "/api/v1/bookings", Some(body)).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let resp = send(&app, "GET", "/api/v1/bookings/999", None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(resp).await["code"], "not_found");

    let resp = send(&app, "GET", "/api/v1/bookings?status=archived", None).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn type_booking_and_availability() {
    let h = hotel(jan(1)).await;
    add_room(&h.db, h.deluxe, "101").await;
    add_room(&h.db, h.deluxe, "102").await;
    let app = app(&h);

    let request = json!({
        "room_type": "deluxe",
        "total_rooms": 3,
        "name": "Budi",
        "phone": "0812",
        "check_in": "2024-01-10",
        "check_out": "2024-01-12",
        "guests": 4
    });
    let resp = send(&app, "POST", "/api/v1/bookings/by-type", Some(request.clone())).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert_eq!(json_body(resp).await["code"], "insufficient_availability");

    let mut request = request;
    request["total_rooms"] = json!(2);
    let resp = send(&app, "POST", "/api/v1/bookings/by-type", Some(request)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = json_body(resp).await;
    assert_eq!(body["data"]["bookings"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"]["total_price"], 2_000_000);

    let resp = send(
        &app,
        "GET",
        "/api/v1/availability?check_in=2024-01-10&check_out=2024-01-12&type=deluxe",
        None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["room_type"], "deluxe");
    // pending bookings do not take rooms out of availability
    assert_eq!(rows[0]["available_rooms"], 2);

    let resp = send(
        &app,
        "GET",
        "/api/v1/availability?check_in=2024-01-10&check_out=2024-01-12&type=villa",
        None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_is_paginated() {
    let h = hotel(jan(1)).await;
    let room = add_room(&h.db, h.deluxe, "101").await;
    let app = app(&h);
    for (a, b) in [
        ("2024-01-02", "2024-01-03"),
        ("2024-01-04", "2024-01-05"),
        ("2024-01-06", "2024-01-07"),
    ] {
        let resp = send(&app, "POST", "/api/v1/bookings", Some(booking_request(room, a, b))).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let resp = send(&app, "GET", "/api/v1/bookings?limit=2&status=pending", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["data"]["total"], 3);
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"]["has_more"], true);
    assert_eq!(body["data"]["items"][0]["check_in"], "2024-01-06");
}

#[tokio::test]
async fn reconciliation_run_and_health() {
    let h = hotel(jan(1)).await;
    let room = add_room(&h.db, h.deluxe, "101").await;
    let app = app(&h);

    let resp = send(
        &app,
        "POST",
        "/api/v1/bookings",
        Some(booking_request(room, "2024-01-10", "2024-01-12")),
    )
    .await;
    let id = json_body(resp).await["data"]["bookings"][0]["id"].as_i64().unwrap();
    send(&app, "POST", &format!("/api/v1/bookings/{id}/confirm"), None).await;

    h.clock.set(jan(10));
    let resp = send(&app, "POST", "/api/v1/reconciliation/run", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["data"]["checked_in"], 1);
    assert_eq!(body["data"]["checked_out"], 0);

    let resp = send(&app, "GET", "/health", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["database"]["status"], "ok");

    let resp = send(&app, "GET", "/metrics", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
}
