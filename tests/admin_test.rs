mod common;

use serde_json::Value;

#[tokio::test]
async fn user_management_lifecycle() {
    let app = common::spawn_app().await;
    let (admin_id, admin_token) = common::create_test_user(&app, "mgmt_admin").await;
    common::make_admin(&app.db, admin_id).await;

    // Create
    let resp = app
        .client
        .post(app.url("/admin/users"))
        .bearer_auth(&admin_token)
        .json(&serde_json::json!({
            "username": "field_staff",
            "email": "field_staff@example.com",
            "password": "staff_password_1",
            "role": "user"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let created_id = body["data"]["id"].as_i64().unwrap();
    assert_eq!(body["data"]["role"], "user");

    // The created account can actually log in
    let resp = app
        .client
        .post(app.url("/auth/login"))
        .json(&serde_json::json!({
            "identifier": "field_staff",
            "password": "staff_password_1"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    // Invalid role is rejected
    let resp = app
        .client
        .post(app.url("/admin/users"))
        .bearer_auth(&admin_token)
        .json(&serde_json::json!({
            "username": "superuser",
            "email": "superuser@example.com",
            "password": "super_password_1",
            "role": "superadmin"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    // Update role
    let resp = app
        .client
        .put(app.url(&format!("/admin/users/{}", created_id)))
        .bearer_auth(&admin_token)
        .json(&serde_json::json!({ "role": "admin" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["role"], "admin");

    // Listing shows both accounts
    let resp = app
        .client
        .get(app.url("/admin/users?page=1&per_page=50"))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert!(body["data"]["total"].as_i64().unwrap() >= 2);
    assert!(body["data"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .any(|u| u["username"] == "field_staff"));

    // Delete
    let resp = app
        .client
        .delete(app.url(&format!("/admin/users/{}", created_id)))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = app
        .client
        .delete(app.url(&format!("/admin/users/{}", created_id)))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn admin_cannot_delete_own_account() {
    let app = common::spawn_app().await;
    let (admin_id, admin_token) = common::create_test_user(&app, "self_admin").await;
    common::make_admin(&app.db, admin_id).await;

    let resp = app
        .client
        .delete(app.url(&format!("/admin/users/{}", admin_id)))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "You cannot delete your own account");
}

#[tokio::test]
async fn admin_actions_land_in_the_activity_log() {
    let app = common::spawn_app().await;
    let (admin_id, admin_token) = common::create_test_user(&app, "activity_admin").await;
    common::make_admin(&app.db, admin_id).await;

    let resp = app
        .client
        .post(app.url("/admin/users"))
        .bearer_auth(&admin_token)
        .json(&serde_json::json!({
            "username": "logged_creation",
            "email": "logged_creation@example.com",
            "password": "logged_password_1",
            "role": "user"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = app
        .client
        .get(app.url("/admin/activity"))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let entries = body["data"]["items"].as_array().unwrap();
    assert!(entries.iter().any(|e| {
        e["action"] == "user_created"
            && e["details"]
                .as_str()
                .map(|d| d.contains("logged_creation"))
                .unwrap_or(false)
    }));
}

#[tokio::test]
async fn user_endpoints_reject_non_admins() {
    let app = common::spawn_app().await;
    let (_user_id, token) = common::create_test_user(&app, "plain_user").await;

    let resp = app
        .client
        .get(app.url("/admin/users"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);

    let resp = app
        .client
        .get(app.url("/admin/activity"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);
}
