//! API integration tests
//!
//! These run against a live server with a migrated database:
//! cargo test -- --ignored

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Create a booking for a weekday slot and return its JSON body
async fn book_test_appointment(client: &Client) -> Value {
    let response = client
        .post(format!("{}/appointments", BASE_URL))
        .json(&json!({
            "full_name": "Test Customer",
            "phone": "555-0199",
            "email": "test.customer@example.com",
            "vehicle_make": "Honda",
            "vehicle_model": "Civic",
            "car_number": "TST-001",
            "services": ["Oil Change"],
            "appointment_date": "2030-06-10",
            "appointment_time": "8:00 AM",
            "region": "Central",
            "branch": "Downtown"
        }))
        .send()
        .await
        .expect("Failed to send booking request");

    assert_eq!(response.status(), 201);
    response.json().await.expect("Failed to parse booking response")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_book_and_delete_appointment() {
    let client = Client::new();

    let body = book_test_appointment(&client).await;
    assert_eq!(body["status"], "pending");
    assert_eq!(body["appointment_time"], "08:00:00");
    assert!(body["service_type"].is_array());
    let id = body["id"].as_str().expect("No appointment ID").to_string();

    let response = client
        .delete(format!("{}/appointments/{}", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 204);
}

#[tokio::test]
#[ignore]
async fn test_booking_with_missing_fields_is_rejected() {
    let client = Client::new();

    let response = client
        .post(format!("{}/appointments", BASE_URL))
        .json(&json!({
            "full_name": "   ",
            "phone": "555-0199",
            "services": [],
            "appointment_date": "2030-06-10",
            "appointment_time": "8:00 AM"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["message"].as_str().unwrap().contains("full_name"));
}

#[tokio::test]
#[ignore]
async fn test_admin_create_bypasses_booking_gate() {
    let client = Client::new();

    // An empty service list fails the public booking gate but is fine here
    let response = client
        .post(format!("{}/appointments/admin", BASE_URL))
        .json(&json!({
            "appointment_date": "2030-06-11",
            "appointment_time": "09:00:00",
            "full_name": "Walk-in Customer",
            "phone": "555-0188",
            "email": null,
            "vehicle_make": "Ford",
            "vehicle_model": "Focus",
            "car_number": "WLK-002",
            "service_type": [],
            "region": "Central",
            "branch": "Downtown"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "pending");
    assert_eq!(body["full_name"], "Walk-in Customer");
    let id = body["id"].as_str().expect("No appointment ID").to_string();

    let _ = client
        .delete(format!("{}/appointments/{}", BASE_URL, id))
        .send()
        .await;
}

#[tokio::test]
#[ignore]
async fn test_list_appointments() {
    let client = Client::new();

    let response = client
        .get(format!("{}/appointments", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body.is_array());
}

#[tokio::test]
#[ignore]
async fn test_status_transitions() {
    let client = Client::new();

    let body = book_test_appointment(&client).await;
    let id = body["id"].as_str().expect("No appointment ID").to_string();

    // pending -> confirmed
    let response = client
        .put(format!("{}/appointments/{}/status", BASE_URL, id))
        .json(&json!({ "status": "confirmed" }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "confirmed");

    // confirmed -> completed
    let response = client
        .put(format!("{}/appointments/{}/status", BASE_URL, id))
        .json(&json!({ "status": "completed" }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    // completed is terminal
    let response = client
        .put(format!("{}/appointments/{}/status", BASE_URL, id))
        .json(&json!({ "status": "pending" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 422);

    // Cleanup
    let _ = client
        .delete(format!("{}/appointments/{}", BASE_URL, id))
        .send()
        .await;
}

#[tokio::test]
#[ignore]
async fn test_update_appointment_fields() {
    let client = Client::new();

    let body = book_test_appointment(&client).await;
    let id = body["id"].as_str().expect("No appointment ID").to_string();

    let response = client
        .put(format!("{}/appointments/{}", BASE_URL, id))
        .json(&json!({ "phone": "555-0042" }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["phone"], "555-0042");
    // Untouched fields survive a partial update
    assert_eq!(body["full_name"], "Test Customer");

    let _ = client
        .delete(format!("{}/appointments/{}", BASE_URL, id))
        .send()
        .await;
}

#[tokio::test]
#[ignore]
async fn test_week_availability_grid() {
    let client = Client::new();

    let response = client
        .get(format!("{}/availability/week?pivot=2030-06-10", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    // Week runs Sunday through Saturday
    assert_eq!(body["week_start"], "2030-06-09");
    assert_eq!(body["days"].as_array().unwrap().len(), 7);
    // Seven catalog slots, each spanning the seven days
    let slots = body["slots"].as_array().unwrap();
    assert_eq!(slots.len(), 7);
    for slot in slots {
        assert_eq!(slot["cells"].as_array().unwrap().len(), 7);
    }
    // The Sunday column is closed
    let first_cells = slots[0]["cells"].as_array().unwrap();
    assert_eq!(first_cells[0]["status"], "sunday");
    assert_eq!(first_cells[0]["selectable"], false);
}

#[tokio::test]
#[ignore]
async fn test_get_missing_appointment_is_404() {
    let client = Client::new();

    let response = client
        .get(format!(
            "{}/appointments/00000000-0000-0000-0000-000000000000",
            BASE_URL
        ))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}
