mod common;

use serde_json::Value;

async fn create_bill(app: &common::TestApp, admin_token: &str, user_id: i32, amount: f64) -> i64 {
    let resp = app
        .client
        .post(app.url("/admin/bills"))
        .bearer_auth(admin_token)
        .json(&serde_json::json!({
            "user_id": user_id,
            "amount": amount,
            "month": "July",
            "year": 2026
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    body["data"]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn pay_bill_simulates_gcash() {
    let app = common::spawn_app().await;
    let (user_id, token) = common::create_test_user(&app, "bill_payer").await;
    let (admin_id, admin_token) = common::create_test_user(&app, "bill_admin").await;
    common::make_admin(&app.db, admin_id).await;

    let bill_id = create_bill(&app, &admin_token, user_id, 350.75).await;

    // The bill shows up unpaid for its owner
    let resp = app
        .client
        .get(app.url("/bills"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let bills = body["data"].as_array().unwrap();
    assert_eq!(bills.len(), 1);
    assert_eq!(bills[0]["status"], "Unpaid");

    let resp = app
        .client
        .post(app.url(&format!("/bills/{}/pay", bill_id)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["status"], "Paid");
    assert_eq!(body["data"]["payment_method"], "GCash");
    let reference = body["data"]["reference_no"].as_str().unwrap();
    assert!(reference.starts_with("TXN-"));
    assert_eq!(reference.len(), 10);
    assert!(body["data"]["date_paid"].is_string());

    // Paying twice is rejected
    let resp = app
        .client
        .post(app.url(&format!("/bills/{}/pay", bill_id)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Bill is already paid");
}

#[tokio::test]
async fn paying_someone_elses_bill_looks_missing() {
    let app = common::spawn_app().await;
    let (owner_id, _owner_token) = common::create_test_user(&app, "bill_owner").await;
    let (_other_id, other_token) = common::create_test_user(&app, "bill_other").await;
    let (admin_id, admin_token) = common::create_test_user(&app, "bill_scope_admin").await;
    common::make_admin(&app.db, admin_id).await;

    let bill_id = create_bill(&app, &admin_token, owner_id, 120.00).await;

    let resp = app
        .client
        .post(app.url(&format!("/bills/{}/pay", bill_id)))
        .bearer_auth(&other_token)
        .send()
        .await
        .unwrap();
    // Existence is not leaked to non-owners
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn create_bill_requires_admin_and_positive_amount() {
    let app = common::spawn_app().await;
    let (user_id, token) = common::create_test_user(&app, "bill_creator").await;
    let (admin_id, admin_token) = common::create_test_user(&app, "bill_creator_admin").await;
    common::make_admin(&app.db, admin_id).await;

    let resp = app
        .client
        .post(app.url("/admin/bills"))
        .bearer_auth(&token)
        .json(&serde_json::json!({
            "user_id": user_id,
            "amount": 100.0,
            "month": "July",
            "year": 2026
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);

    let resp = app
        .client
        .post(app.url("/admin/bills"))
        .bearer_auth(&admin_token)
        .json(&serde_json::json!({
            "user_id": user_id,
            "amount": 0.0,
            "month": "July",
            "year": 2026
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn admin_bill_listing_is_paginated() {
    let app = common::spawn_app().await;
    let (user_id, _token) = common::create_test_user(&app, "bill_page_user").await;
    let (admin_id, admin_token) = common::create_test_user(&app, "bill_page_admin").await;
    common::make_admin(&app.db, admin_id).await;

    for _ in 0..3 {
        create_bill(&app, &admin_token, user_id, 99.50).await;
    }

    let resp = app
        .client
        .get(app.url("/admin/bills?page=1&per_page=2"))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert!(body["data"]["total"].as_i64().unwrap() >= 3);
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"]["per_page"], 2);
}
