//! API integration tests
//!
//! Run against a live server with an empty-ish database, started with the
//! same `SPECEQUI_AUTH__BOOTSTRAP_ADMIN__*` variables as the test process:
//! `cargo test --test api_tests -- --ignored`

use reqwest::{multipart, Client, StatusCode};
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";
const ROOT_URL: &str = "http://localhost:8080";

/// Register a throwaway account and return its token and username
async fn register(client: &Client) -> (String, String) {
    let username = format!("tester_{}", uuid::Uuid::new_v4().simple());
    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({
            "username": username,
            "email": format!("{}@example.ru", username),
            "password": "correct-horse",
            "password_confirm": "correct-horse"
        }))
        .send()
        .await
        .expect("Failed to send register request");
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = response.json().await.expect("Failed to parse register response");
    let token = body["token"].as_str().expect("No token in response").to_string();
    (token, username)
}

/// Log in as the bootstrap staff account the server was started with
async fn staff_token(client: &Client) -> String {
    let login = std::env::var("SPECEQUI_AUTH__BOOTSTRAP_ADMIN__USERNAME")
        .expect("SPECEQUI_AUTH__BOOTSTRAP_ADMIN__USERNAME must match the server's bootstrap admin");
    let password = std::env::var("SPECEQUI_AUTH__BOOTSTRAP_ADMIN__PASSWORD")
        .expect("SPECEQUI_AUTH__BOOTSTRAP_ADMIN__PASSWORD must match the server's bootstrap admin");
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "login": login, "password": password }))
        .send()
        .await
        .expect("Failed to send login request");
    assert_eq!(response.status(), StatusCode::OK, "bootstrap staff login failed");

    let body: Value = response.json().await.expect("Failed to parse login response");
    assert_eq!(body["user"]["is_staff"], true);
    body["token"].as_str().expect("No token in response").to_string()
}

async fn create_equipment(client: &Client, token: &str, body: Value) -> reqwest::Response {
    client
        .post(format!("{}/equipment", BASE_URL))
        .bearer_auth(token)
        .json(&body)
        .send()
        .await
        .expect("Failed to send create request")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", ROOT_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");

    let ready = client
        .get(format!("{}/ready", ROOT_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert!(ready.status().is_success());
}

#[tokio::test]
#[ignore]
async fn test_login_by_username_and_email() {
    let client = Client::new();
    let (_, username) = register(&client).await;

    for login in [username.to_uppercase(), format!("{}@EXAMPLE.ru", username)] {
        let response = client
            .post(format!("{}/auth/login", BASE_URL))
            .json(&json!({ "login": login, "password": "correct-horse" }))
            .send()
            .await
            .expect("Failed to send request");
        assert!(response.status().is_success(), "login with {} failed", login);

        let body: Value = response.json().await.expect("Failed to parse response");
        assert!(body["token"].is_string());
        assert_eq!(body["token_type"], "Bearer");
        assert!(body["user"]["last_login"].is_string());
        assert!(body["user"].get("password").is_none());
    }
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();
    let (_, username) = register(&client).await;

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "login": username, "password": "wrong-horse" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore]
async fn test_duplicate_username_is_a_field_error() {
    let client = Client::new();
    let (_, username) = register(&client).await;

    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({
            "username": username,
            "password": "correct-horse",
            "password_confirm": "correct-horse"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["fields"]["username"].is_array());
}

#[tokio::test]
#[ignore]
async fn test_unauthorized_access() {
    let client = Client::new();

    let response = create_equipment(&client, "invalid-token", json!({})).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = client
        .post(format!("{}/uploads", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore]
async fn test_slug_collisions_get_numeric_suffix() {
    let client = Client::new();
    let (token, _) = register(&client).await;
    let title = format!("Crane {}", uuid::Uuid::new_v4().simple());
    let base = title.to_lowercase().replace(' ', "-");

    let mut slugs = Vec::new();
    for _ in 0..3 {
        let response = create_equipment(
            &client,
            &token,
            json!({ "title": title, "price_per_hour": "2500.00" }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body: Value = response.json().await.expect("Failed to parse response");
        assert_eq!(body["status"], "draft");
        slugs.push(body["slug"].as_str().unwrap().to_string());
    }

    assert_eq!(slugs, vec![base.clone(), format!("{}-1", base), format!("{}-2", base)]);
}

#[tokio::test]
#[ignore]
async fn test_explicit_slug_collision_is_a_field_error() {
    let client = Client::new();
    let (token, _) = register(&client).await;
    let slug = format!("kran-{}", uuid::Uuid::new_v4().simple());

    let first = create_equipment(
        &client,
        &token,
        json!({ "title": "Кран", "slug": slug, "price_per_hour": "2500.00" }),
    )
    .await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = create_equipment(
        &client,
        &token,
        json!({ "title": "Кран", "slug": slug, "price_per_hour": "2500.00" }),
    )
    .await;
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);
    let body: Value = second.json().await.expect("Failed to parse response");
    assert!(body["fields"]["slug"].is_array());
}

#[tokio::test]
#[ignore]
async fn test_validation_errors_per_field() {
    let client = Client::new();
    let (token, _) = register(&client).await;

    let response = create_equipment(
        &client,
        &token,
        json!({
            "title": "кран",
            "price_per_hour": "60000",
            "manufacturer_id": 2147483647,
            "tag_ids": [2147483647]
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["fields"]["title"].is_array());
    assert!(body["fields"]["price_per_hour"].is_array());
}

#[tokio::test]
#[ignore]
async fn test_drafts_hidden_from_public() {
    let client = Client::new();
    let (token, _) = register(&client).await;
    let title = format!("Каток {}", uuid::Uuid::new_v4().simple());

    let response = create_equipment(
        &client,
        &token,
        json!({ "title": title, "price_per_hour": "1200.00" }),
    )
    .await;
    let created: Value = response.json().await.expect("Failed to parse response");
    let slug = created["slug"].as_str().unwrap();

    let detail = client
        .get(format!("{}/equipment/{}", BASE_URL, slug))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(detail.status(), StatusCode::NOT_FOUND);

    let listing: Value = client
        .get(format!("{}/equipment", BASE_URL))
        .query(&[("q", title.as_str())])
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(listing["pagination"]["total"], 0);

    // Regular users cannot publish
    let publish = client
        .post(format!("{}/equipment/{}/publish", BASE_URL, slug))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(publish.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore]
async fn test_listing_contract() {
    let client = Client::new();

    let body: Value = client
        .get(format!("{}/equipment", BASE_URL))
        .query(&[("sort", "bogus"), ("page", "999999")])
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    assert_eq!(body["sort"], "new");
    let page = body["pagination"]["page"].as_i64().unwrap();
    let total_pages = body["pagination"]["total_pages"].as_i64().unwrap();
    assert_eq!(page, total_pages);
    assert!(body["items"].as_array().unwrap().len() <= body["pagination"]["page_size"].as_u64().unwrap() as usize);

    let window = body["context"]["page_range"].as_array().unwrap();
    assert!(!window.is_empty() && window.len() <= 5);
    assert!(body["context"]["menu"].as_array().unwrap().len() > 1);
}

#[tokio::test]
#[ignore]
async fn test_publish_search_and_sort() {
    let client = Client::new();
    let staff = staff_token(&client).await;
    let marker = uuid::Uuid::new_v4().simple().to_string();

    for (title, price) in [
        (format!("Экскаватор {}", marker), "3000.00"),
        (format!("Бульдозер {}", marker), "1500.00"),
        (format!("Кран {}", marker), "7000.00"),
    ] {
        let response = create_equipment(
            &client,
            &staff,
            json!({ "title": title, "price_per_hour": price, "status": "published" }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let body: Value = client
        .get(format!("{}/equipment", BASE_URL))
        .query(&[("q", marker.to_uppercase().as_str()), ("sort", "-price")])
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    let prices: Vec<&str> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["price_per_hour"].as_str().unwrap())
        .collect();
    assert_eq!(prices, vec!["7000.00", "3000.00", "1500.00"]);
}

#[tokio::test]
#[ignore]
async fn test_manufacturer_delete_keeps_equipment() {
    let client = Client::new();
    let staff = staff_token(&client).await;

    let manufacturer: Value = client
        .post(format!("{}/manufacturers", BASE_URL))
        .bearer_auth(&staff)
        .json(&json!({ "name": format!("Komatsu {}", uuid::Uuid::new_v4().simple()), "country": "Япония" }))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    let manufacturer_id = manufacturer["id"].as_i64().unwrap();

    let mut slugs = Vec::new();
    for _ in 0..3 {
        let created: Value = create_equipment(
            &client,
            &staff,
            json!({ "title": "Экскаватор Komatsu", "price_per_hour": "2500.00", "manufacturer_id": manufacturer_id }),
        )
        .await
        .json()
        .await
        .expect("Failed to parse response");
        slugs.push(created["slug"].as_str().unwrap().to_string());
    }

    let response = client
        .delete(format!("{}/manufacturers/{}", BASE_URL, manufacturer_id))
        .bearer_auth(&staff)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    for slug in slugs {
        let body: Value = client
            .get(format!("{}/equipment/{}", BASE_URL, slug))
            .bearer_auth(&staff)
            .send()
            .await
            .expect("Failed to send request")
            .json()
            .await
            .expect("Failed to parse response");
        assert!(body["manufacturer"].is_null());
    }
}

#[tokio::test]
#[ignore]
async fn test_delete_points_back_to_listing() {
    let client = Client::new();
    let (token, _) = register(&client).await;

    let created: Value = create_equipment(
        &client,
        &token,
        json!({ "title": "Самосвал", "price_per_hour": "1800.00" }),
    )
    .await
    .json()
    .await
    .expect("Failed to parse response");
    let slug = created["slug"].as_str().unwrap();

    let response = client
        .delete(format!("{}/equipment/{}", BASE_URL, slug))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(response.headers()["location"], "/api/v1/equipment");
}

#[tokio::test]
#[ignore]
async fn test_upload_file() {
    let client = Client::new();
    let (token, _) = register(&client).await;

    let part = multipart::Part::bytes(b"hello".to_vec())
        .file_name("Отчет.txt")
        .mime_str("text/plain")
        .unwrap();
    let form = multipart::Form::new().part("file", part);

    let response = client
        .post(format!("{}/uploads", BASE_URL))
        .bearer_auth(&token)
        .multipart(form)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["size"], 5);
    assert_eq!(
        body["sha256"],
        "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
    );
    let url = body["url"].as_str().unwrap();
    assert!(url.starts_with("/media/uploads/"));

    let served = client
        .get(format!("{}{}", ROOT_URL, url))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(served.text().await.unwrap(), "hello");
}

#[tokio::test]
#[ignore]
async fn test_analytics_summary() {
    let client = Client::new();

    let body: Value = client
        .get(format!("{}/analytics", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    assert_eq!(body["criteria"]["markup"], "1.20");
    assert!(body["totals"]["count"].is_i64());
    assert!(body["by_manufacturer"].is_array());
    assert!(body["by_tag"].is_array());
    assert_eq!(body["context"]["title"], "Аналитика");
}

#[tokio::test]
#[ignore]
async fn test_staff_can_promote_user() {
    let client = Client::new();
    let staff = staff_token(&client).await;
    let (token, _) = register(&client).await;

    let me: Value = client
        .get(format!("{}/auth/me", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    let user_id = me["id"].as_i64().unwrap();

    // Regular users cannot promote anyone, themselves included
    let response = client
        .put(format!("{}/users/{}/staff", BASE_URL, user_id))
        .bearer_auth(&token)
        .json(&json!({ "is_staff": true }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = client
        .put(format!("{}/users/{}/staff", BASE_URL, user_id))
        .bearer_auth(&staff)
        .json(&json!({ "is_staff": true }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["is_staff"], true);
}
