mod common;

use serde_json::Value;

async fn submit_report(app: &common::TestApp, token: &str, title: &str) -> i64 {
    let form = reqwest::multipart::Form::new()
        .text("title", title.to_string())
        .text("description", "Observed on the main road")
        .text("latitude", "11.5621")
        .text("longitude", "124.3976");

    let resp = app
        .client
        .post(app.url("/reports"))
        .bearer_auth(token)
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert!(body["success"].as_bool().unwrap());
    body["data"]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn submit_report_without_location_fails() {
    let app = common::spawn_app().await;
    let (_user_id, token) = common::create_test_user(&app, "report_loc").await;

    let form = reqwest::multipart::Form::new()
        .text("title", "Broken hydrant")
        .text("description", "Hydrant cover missing");

    let resp = app
        .client
        .post(app.url("/reports"))
        .bearer_auth(&token)
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Please select a location on the map.");
}

#[tokio::test]
async fn map_feed_is_public_and_flat() {
    let app = common::spawn_app().await;
    let (_user_id, token) = common::create_test_user(&app, "map_user").await;
    submit_report(&app, &token, "Map feed entry").await;

    // No auth header
    let resp = app
        .client
        .get(app.url("/map/reports"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();

    // Bare array, not wrapped in an envelope
    let entries = body.as_array().expect("bare array");
    let entry = entries
        .iter()
        .find(|e| e["title"] == "Map feed entry")
        .expect("submitted report in feed");

    assert!(entry["user"].is_string());
    assert_eq!(entry["status"], "Pending");
    assert!(entry["latitude"].is_f64());
    assert!(entry["longitude"].is_f64());
    // Unset fields come back as empty strings
    assert!(entry["area"].is_string());
    assert!(entry["barangay"].is_string());
    let created_at = entry["created_at"].as_str().unwrap();
    assert_eq!(created_at.len(), 19);
}

#[tokio::test]
async fn my_reports_are_scoped_to_the_caller() {
    let app = common::spawn_app().await;
    let (_id_a, token_a) = common::create_test_user(&app, "mine_a").await;
    let (_id_b, token_b) = common::create_test_user(&app, "mine_b").await;

    submit_report(&app, &token_a, "Report by caller A").await;
    submit_report(&app, &token_b, "Report by caller B").await;

    let resp = app
        .client
        .get(app.url("/reports/mine"))
        .bearer_auth(&token_a)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["title"], "Report by caller A");
    // Compact shape uses the short date format
    let date = entries[0]["date_reported"].as_str().unwrap();
    assert_eq!(date.len(), 16);

    // Detailed variant wraps entries and includes the description
    let resp = app
        .client
        .get(app.url("/reports/mine/detailed"))
        .bearer_auth(&token_a)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let entries = body["reports"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert!(entries[0]["description"].is_string());
    assert_eq!(entries[0]["date_submitted"].as_str().unwrap().len(), 19);
}

#[tokio::test]
async fn status_update_notifies_the_reporter() {
    let app = common::spawn_app().await;
    let (_user_id, token) = common::create_test_user(&app, "notify_reporter").await;
    let (admin_id, admin_token) = common::create_test_user(&app, "notify_admin").await;
    common::make_admin(&app.db, admin_id).await;

    let report_id = submit_report(&app, &token, "Report awaiting repair").await;

    let resp = app
        .client
        .put(app.url(&format!("/admin/reports/{}/status", report_id)))
        .bearer_auth(&admin_token)
        .json(&serde_json::json!({
            "status": "In Progress",
            "remarks": "Scheduled for Friday"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["status"], "In Progress");
    assert_eq!(body["data"]["remarks"], "Scheduled for Friday");

    // Reporter receives a notification about the change
    let resp = app
        .client
        .get(app.url("/notifications"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let messages: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|n| n["message"].as_str())
        .collect();
    assert!(messages
        .iter()
        .any(|m| m.contains("Report awaiting repair") && m.contains("In Progress")));
}

#[tokio::test]
async fn invalid_report_status_is_rejected() {
    let app = common::spawn_app().await;
    let (_user_id, token) = common::create_test_user(&app, "bad_status").await;
    let (admin_id, admin_token) = common::create_test_user(&app, "bad_status_admin").await;
    common::make_admin(&app.db, admin_id).await;

    let report_id = submit_report(&app, &token, "Report with bad status").await;

    let resp = app
        .client
        .put(app.url(&format!("/admin/reports/{}/status", report_id)))
        .bearer_auth(&admin_token)
        .json(&serde_json::json!({ "status": "Approved" }))
        .send()
        .await
        .unwrap();
    // Approved exists only for complaints
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn admin_report_listing_and_delete() {
    let app = common::spawn_app().await;
    let (_user_id, token) = common::create_test_user(&app, "admin_list").await;
    let (admin_id, admin_token) = common::create_test_user(&app, "admin_list_admin").await;
    common::make_admin(&app.db, admin_id).await;

    let report_id = submit_report(&app, &token, "Report for the admin table").await;

    // Non-admin is rejected
    let resp = app
        .client
        .get(app.url("/admin/reports"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);

    let resp = app
        .client
        .get(app.url("/admin/reports?page=1&per_page=10"))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert!(body["data"]["total"].as_i64().unwrap() >= 1);
    assert!(body["data"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .any(|r| r["title"] == "Report for the admin table"));

    let resp = app
        .client
        .delete(app.url(&format!("/admin/reports/{}", report_id)))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    // Deleting again is a 404
    let resp = app
        .client
        .delete(app.url(&format!("/admin/reports/{}", report_id)))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}
