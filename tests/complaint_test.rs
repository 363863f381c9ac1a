mod common;

use sea_orm::ConnectionTrait;
use serde_json::Value;

async fn count_rows(app: &common::TestApp, sql: &str) -> i64 {
    let row = app
        .db
        .query_one(sea_orm::Statement::from_string(
            sea_orm::DatabaseBackend::Postgres,
            sql.to_string(),
        ))
        .await
        .unwrap()
        .unwrap();
    row.try_get("", "count").unwrap()
}

#[tokio::test]
async fn submit_complaint_mirrors_a_report_row() {
    let app = common::spawn_app().await;
    let (_user_id, token) = common::create_test_user(&app, "mirror_user").await;

    let resp = app
        .client
        .post(app.url("/complaints"))
        .bearer_auth(&token)
        .multipart(common::complaint_form("Naval", "Centro", "3"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert!(body["success"].as_bool().unwrap());
    assert_eq!(body["message"], "Complaint submitted successfully!");
    assert_eq!(body["data"]["status"], "Pending");

    // The mirrored row carries the composed location text
    let row = app
        .db
        .query_one(sea_orm::Statement::from_string(
            sea_orm::DatabaseBackend::Postgres,
            "SELECT location, issue_type, address, status FROM reports \
             WHERE location = 'Purok 3, Brgy. Centro, Naval'"
                .to_string(),
        ))
        .await
        .unwrap()
        .expect("mirrored report row not found");
    let issue_type: Option<String> = row.try_get("", "issue_type").unwrap();
    let address: Option<String> = row.try_get("", "address").unwrap();
    let status: String = row.try_get("", "status").unwrap();
    assert_eq!(issue_type.as_deref(), Some("Naval"));
    assert_eq!(address.as_deref(), Some("Centro"));
    assert_eq!(status, "Pending");
}

#[tokio::test]
async fn submit_without_location_creates_nothing() {
    let app = common::spawn_app().await;
    let (_user_id, token) = common::create_test_user(&app, "no_location").await;

    let form = reqwest::multipart::Form::new()
        .text("title", "Leaking pipe at the corner")
        .text("description", "Water has been pooling for a week")
        .text("area", "Naval")
        .text("barangay", "Centro");

    let resp = app
        .client
        .post(app.url("/complaints"))
        .bearer_auth(&token)
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(
        body["error"],
        "Please select a location on the map before submitting."
    );

    // The rejection happens before any insert
    let complaints = count_rows(
        &app,
        "SELECT COUNT(*) AS count FROM complaints WHERE title = 'Leaking pipe at the corner'",
    )
    .await;
    let reports = count_rows(
        &app,
        "SELECT COUNT(*) AS count FROM reports WHERE title = 'Leaking pipe at the corner'",
    )
    .await;
    assert_eq!(complaints, 0);
    assert_eq!(reports, 0);
}

#[tokio::test]
async fn submit_with_unknown_municipality_fails() {
    let app = common::spawn_app().await;
    let (_user_id, token) = common::create_test_user(&app, "bad_area").await;

    let resp = app
        .client
        .post(app.url("/complaints"))
        .bearer_auth(&token)
        .multipart(common::complaint_form("Atlantis", "Centro", "1"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Unknown municipality: Atlantis");
}

#[tokio::test]
async fn submit_requires_auth() {
    let app = common::spawn_app().await;

    let resp = app
        .client
        .post(app.url("/complaints"))
        .multipart(common::complaint_form("Naval", "Centro", "3"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn complaint_feed_shape() {
    let app = common::spawn_app().await;
    let (_user_id, token) = common::create_test_user(&app, "feed_user").await;
    common::create_test_complaint(&app, &token).await;

    // Feed is public
    let resp = app.client.get(app.url("/complaints")).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();

    let reports = body["reports"].as_array().expect("reports array");
    assert!(!reports.is_empty());
    let entry = &reports[0];
    assert!(entry["id"].is_i64());
    assert!(entry["title"].is_string());
    assert!(entry["status"].is_string());
    assert!(entry["latitude"].is_f64());
    assert!(entry["longitude"].is_f64());
    assert!(entry["user"]["username"].is_string());
    assert!(entry["user"]["email"].is_string());
    assert!(entry["photos"].is_array());
    // date_submitted is formatted, not an ISO timestamp
    let date = entry["date_submitted"].as_str().unwrap();
    assert_eq!(date.len(), 19);
    assert!(!date.contains('T'));
}

#[tokio::test]
async fn complaint_feed_filters() {
    let app = common::spawn_app().await;
    let (_user_id, token) = common::create_test_user(&app, "filter_user").await;

    let resp = app
        .client
        .post(app.url("/complaints"))
        .bearer_auth(&token)
        .multipart(
            reqwest::multipart::Form::new()
                .text("title", "Brown water in Culaba")
                .text("description", "Water runs brown every morning")
                .text("area", "Culaba")
                .text("latitude", "11.657")
                .text("longitude", "124.542"),
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    // Municipality filter matches
    let resp = app
        .client
        .get(app.url("/complaints?municipalities=Culaba,Kawayan"))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert!(body["reports"]
        .as_array()
        .unwrap()
        .iter()
        .any(|r| r["title"] == "Brown water in Culaba"));

    // Text search against title and description
    let resp = app
        .client
        .get(app.url("/complaints?q=brown"))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert!(body["reports"]
        .as_array()
        .unwrap()
        .iter()
        .any(|r| r["title"] == "Brown water in Culaba"));

    // Non-matching status filter excludes it
    let resp = app
        .client
        .get(app.url("/complaints?status=Resolved"))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert!(body["reports"]
        .as_array()
        .unwrap()
        .iter()
        .all(|r| r["title"] != "Brown water in Culaba"));
}

#[tokio::test]
async fn get_complaint_detail_and_missing_id() {
    let app = common::spawn_app().await;
    let (_user_id, token) = common::create_test_user(&app, "detail_user").await;
    let complaint_id = common::create_test_complaint(&app, &token).await;

    let resp = app
        .client
        .get(app.url(&format!("/complaints/{}", complaint_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["id"].as_i64().unwrap() as i32, complaint_id);
    assert_eq!(body["title"], "No water since Monday");

    let resp = app
        .client
        .get(app.url("/complaints/999999"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Resource not found");
}

#[tokio::test]
async fn admin_status_actions() {
    let app = common::spawn_app().await;
    let (user_id, token) = common::create_test_user(&app, "status_user").await;
    let (admin_id, admin_token) = common::create_test_user(&app, "status_admin").await;
    common::make_admin(&app.db, admin_id).await;

    let complaint_id = common::create_test_complaint(&app, &token).await;

    // Non-admin is rejected
    let resp = app
        .client
        .put(app.url(&format!("/admin/complaints/{}/approve", complaint_id)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);

    // Approve
    let resp = app
        .client
        .put(app.url(&format!("/admin/complaints/{}/approve", complaint_id)))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["status"], "Approved");

    // Assign to the submitter
    let resp = app
        .client
        .put(app.url(&format!("/admin/complaints/{}/assign", complaint_id)))
        .bearer_auth(&admin_token)
        .json(&serde_json::json!({ "assigned_to": user_id }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["assigned_to"].as_i64().unwrap() as i32, user_id);

    // Status update with remarks
    let resp = app
        .client
        .put(app.url(&format!("/admin/complaints/{}/status", complaint_id)))
        .bearer_auth(&admin_token)
        .json(&serde_json::json!({
            "status": "In Progress",
            "remarks": "Crew dispatched"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["status"], "In Progress");
    assert_eq!(body["data"]["remarks"], "Crew dispatched");

    // Unknown status is rejected
    let resp = app
        .client
        .put(app.url(&format!("/admin/complaints/{}/status", complaint_id)))
        .bearer_auth(&admin_token)
        .json(&serde_json::json!({ "status": "Vanished" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn delete_complaint_leaves_mirrored_report() {
    let app = common::spawn_app().await;
    let (_user_id, token) = common::create_test_user(&app, "delete_user").await;
    let (admin_id, admin_token) = common::create_test_user(&app, "delete_admin").await;
    common::make_admin(&app.db, admin_id).await;

    let resp = app
        .client
        .post(app.url("/complaints"))
        .bearer_auth(&token)
        .multipart(
            reqwest::multipart::Form::new()
                .text("title", "Complaint slated for deletion")
                .text("description", "Shared main keeps bursting")
                .text("area", "Biliran")
                .text("barangay", "Busali")
                .text("latitude", "11.465")
                .text("longitude", "124.479"),
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let complaint_id = body["data"]["id"].as_i64().unwrap();

    let resp = app
        .client
        .delete(app.url(&format!("/admin/complaints/{}", complaint_id)))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let complaints = count_rows(
        &app,
        "SELECT COUNT(*) AS count FROM complaints WHERE title = 'Complaint slated for deletion'",
    )
    .await;
    assert_eq!(complaints, 0);

    // Nothing links the mirrored row, so it survives the delete
    let reports = count_rows(
        &app,
        "SELECT COUNT(*) AS count FROM reports WHERE title = 'Complaint slated for deletion'",
    )
    .await;
    assert_eq!(reports, 1);
}

#[tokio::test]
async fn complaint_photo_cascades_with_the_complaint() {
    let app = common::spawn_app().await;
    let (_user_id, token) = common::create_test_user(&app, "photo_user").await;
    let (admin_id, admin_token) = common::create_test_user(&app, "photo_admin").await;
    common::make_admin(&app.db, admin_id).await;

    // Minimal JPEG header; the magic bytes are what the upload path validates
    let jpeg = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46];
    let photo = reqwest::multipart::Part::bytes(jpeg)
        .file_name("burst-pipe.jpg")
        .mime_str("image/jpeg")
        .unwrap();
    let form = common::complaint_form("Naval", "Calumpang", "2").part("photo", photo);

    let resp = app
        .client
        .post(app.url("/complaints"))
        .bearer_auth(&token)
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let complaint_id = body["data"]["id"].as_i64().unwrap();
    let photo_url = body["data"]["photo_url"].as_str().unwrap().to_string();
    assert!(photo_url.starts_with("/media/complaint_photos/"));
    assert!(photo_url.ends_with(".jpg"));

    let photos = count_rows(
        &app,
        &format!(
            "SELECT COUNT(*) AS count FROM complaint_photos WHERE complaint_id = {}",
            complaint_id
        ),
    )
    .await;
    assert_eq!(photos, 1);

    // The mirrored report carries the same image
    let row = app
        .db
        .query_one(sea_orm::Statement::from_string(
            sea_orm::DatabaseBackend::Postgres,
            "SELECT image_url FROM reports \
             WHERE location = 'Purok 2, Brgy. Calumpang, Naval'"
                .to_string(),
        ))
        .await
        .unwrap()
        .expect("mirrored report row not found");
    let image_url: Option<String> = row.try_get("", "image_url").unwrap();
    assert_eq!(image_url.as_deref(), Some(photo_url.as_str()));

    // And the public feed lists it under the complaint
    let resp = app.client.get(app.url("/complaints")).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    let feed: Value = resp.json().await.unwrap();
    let entry = feed["reports"]
        .as_array()
        .unwrap()
        .iter()
        .find(|e| e["id"].as_i64() == Some(complaint_id))
        .expect("complaint missing from feed");
    assert_eq!(entry["photos"][0]["url"], photo_url);

    // Deleting the complaint takes its photo rows with it
    let resp = app
        .client
        .delete(app.url(&format!("/admin/complaints/{}", complaint_id)))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let photos = count_rows(
        &app,
        &format!(
            "SELECT COUNT(*) AS count FROM complaint_photos WHERE complaint_id = {}",
            complaint_id
        ),
    )
    .await;
    assert_eq!(photos, 0);

    let reports = count_rows(
        &app,
        "SELECT COUNT(*) AS count FROM reports WHERE location = 'Purok 2, Brgy. Calumpang, Naval'",
    )
    .await;
    assert_eq!(reports, 1);
}
