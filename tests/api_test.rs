//! End-to-end tests against a live server on an ephemeral port.
//!
//! Each test gets its own temporary database and a cookie-keeping client,
//! so signup in one test never leaks a session into another.

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tempfile::TempDir;

use taleweaver::config::Config;
use taleweaver::db;
use taleweaver::routes;
use taleweaver::state::AppState;

struct TestApp {
    base: String,
    client: Client,
    _temp: TempDir,
}

impl TestApp {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn get(&self, path: &str) -> reqwest::Response {
        self.client.get(self.url(path)).send().await.unwrap()
    }

    async fn post(&self, path: &str, body: Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .json(&body)
            .send()
            .await
            .unwrap()
    }

    async fn signup(&self, username: &str) -> Value {
        let res = self
            .post(
                "/api/users",
                json!({
                    "username": username,
                    "email": format!("{}@example.com", username),
                    "password": "correct horse battery",
                }),
            )
            .await;
        assert_eq!(res.status(), StatusCode::OK);
        res.json().await.unwrap()
    }

    async fn create_character(&self, genre: &str, name: &str, class: &str) -> Value {
        let res = self
            .post(
                "/api/game/create",
                json!({ "genre": genre, "name": name, "class": class }),
            )
            .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        res.json().await.unwrap()
    }
}

async fn spawn_app() -> TestApp {
    let temp = TempDir::new().unwrap();
    let mut config = Config::default();
    config.database.path = Some(temp.path().join("test.db"));
    config.auth.password_cost = 4;

    let pool = db::create_pool(&config.db_path()).expect("Failed to create test database");
    db::run_migrations(&pool).expect("Failed to run migrations");
    let app = routes::app(AppState::new(pool, config));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    TestApp {
        base: format!("http://{}", addr),
        client,
        _temp: temp,
    }
}

fn error_code(body: &Value) -> &str {
    body["error"]["code"].as_str().unwrap_or_default()
}

// ============================================================================
// ACCOUNTS
// ============================================================================

#[tokio::test]
async fn signup_signs_in_without_leaking_the_hash() {
    let app = spawn_app().await;
    let user = app.signup("elowen").await;

    assert_eq!(user["username"], "elowen");
    assert_eq!(user["email"], "elowen@example.com");
    assert!(user.get("password_hash").is_none());

    let profile = app.get("/profile").await;
    assert_eq!(profile.status(), StatusCode::OK);
    assert!(profile.text().await.unwrap().contains("elowen"));
}

#[tokio::test]
async fn duplicate_signup_conflicts() {
    let app = spawn_app().await;
    app.signup("elowen").await;

    let res = app
        .post(
            "/api/users",
            json!({
                "username": "elowen",
                "email": "other@example.com",
                "password": "correct horse battery",
            }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = res.json().await.unwrap();
    assert_eq!(error_code(&body), "conflict");
}

#[tokio::test]
async fn concurrent_duplicate_signups_conflict_instead_of_failing() {
    let app = spawn_app().await;

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let client = Client::new();
            let url = app.url("/api/users");
            tokio::spawn(async move {
                client
                    .post(url)
                    .json(&json!({
                        "username": "elowen",
                        "email": "elowen@example.com",
                        "password": "correct horse battery",
                    }))
                    .send()
                    .await
                    .unwrap()
                    .status()
            })
        })
        .collect();

    let mut statuses = Vec::new();
    for handle in handles {
        statuses.push(handle.await.unwrap());
    }
    let created = statuses.iter().filter(|s| **s == StatusCode::OK).count();
    let conflicts = statuses
        .iter()
        .filter(|s| **s == StatusCode::CONFLICT)
        .count();
    assert_eq!(created, 1);
    assert_eq!(conflicts, 7);
}

#[tokio::test]
async fn login_checks_the_password() {
    let app = spawn_app().await;
    app.signup("elowen").await;

    let wrong = app
        .post(
            "/api/users/login",
            json!({ "email": "elowen@example.com", "password": "not the password" }),
        )
        .await;
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);

    let right = app
        .post(
            "/api/users/login",
            json!({ "email": "elowen@example.com", "password": "correct horse battery" }),
        )
        .await;
    assert_eq!(right.status(), StatusCode::OK);
}

#[tokio::test]
async fn logout_ends_the_session() {
    let app = spawn_app().await;
    app.signup("elowen").await;

    let res = app.post("/api/users/logout", json!({})).await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let profile = app.get("/profile").await;
    assert!(profile.status().is_redirection());
}

#[tokio::test]
async fn anonymous_profile_redirects_to_login() {
    let app = spawn_app().await;
    let res = app.get("/profile").await;

    assert!(res.status().is_redirection());
    assert_eq!(res.headers()["location"], "/login");
}

#[tokio::test]
async fn login_page_redirects_signed_in_users() {
    let app = spawn_app().await;
    assert_eq!(app.get("/login").await.status(), StatusCode::OK);

    app.signup("elowen").await;
    let res = app.get("/login").await;
    assert!(res.status().is_redirection());
    assert_eq!(res.headers()["location"], "/profile");
}

// ============================================================================
// CHARACTER LIFECYCLE
// ============================================================================

#[tokio::test]
async fn creating_requires_a_session() {
    let app = spawn_app().await;
    let res = app
        .post(
            "/api/game/create",
            json!({ "genre": "Fantasy", "name": "Elowen", "class": "wizard" }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn creating_rejects_a_class_from_another_genre() {
    let app = spawn_app().await;
    app.signup("elowen").await;

    let res = app
        .post(
            "/api/game/create",
            json!({ "genre": "Sci-Fi", "name": "Vex", "class": "rogue" }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = res.json().await.unwrap();
    assert_eq!(error_code(&body), "validation_failed");
}

#[tokio::test]
async fn full_creation_flow() {
    let app = spawn_app().await;
    app.signup("elowen").await;

    // Step one: zeroed character plus the genre's scenarios
    let created = app.create_character("Fantasy", "Elowen", "wizard").await;
    assert_eq!(created["class"], "Wizard");
    let character = &created["character"];
    let id = character["id"].as_i64().unwrap();
    for stat in ["strength", "agility", "constitution", "wisdom", "intelligence", "charisma"] {
        assert_eq!(character[stat], 0, "{} should start at zero", stat);
    }
    let scenarios = created["scenarios"].as_array().unwrap();
    assert_eq!(scenarios.len(), 3);
    assert!(scenarios.iter().all(|q| q["genre"] == "Fantasy"));
    let quest_id = scenarios[0]["id"].as_i64().unwrap();

    // Step two: class lookup, then both writes
    let class_id = character["class_id"].as_i64().unwrap();
    let class: Value = app
        .get(&format!("/api/class/{}", class_id))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(class["intelligence"], 5);

    let totals = json!({
        "strength": class["strength"],
        "agility": class["agility"],
        "constitution": class["constitution"],
        "wisdom": class["wisdom"],
        "intelligence": class["intelligence"],
        "charisma": class["charisma"],
    });
    let update_path = format!("/api/character/update/{}", id);
    let (linked, updated) = tokio::join!(
        app.post(
            "/api/character/addquest",
            json!({ "characterId": id, "questId": quest_id }),
        ),
        app.post(&update_path, totals),
    );
    assert_eq!(linked.status(), StatusCode::OK);
    let linked: Value = linked.json().await.unwrap();
    assert_eq!(linked["message"], "Association created successfully");
    assert_eq!(updated.status(), StatusCode::OK);

    // Associating again is harmless
    let again = app
        .post(
            "/api/character/addquest",
            json!({ "characterId": id, "questId": quest_id }),
        )
        .await;
    assert_eq!(again.status(), StatusCode::OK);

    let detail: Value = app
        .get(&format!("/api/character/{}", id))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(detail["name"], "Elowen");
    assert_eq!(detail["character_class"]["name"], "Wizard");
    assert_eq!(detail["intelligence"], 5);
    assert_eq!(detail["wisdom"], 4);
    assert_eq!(detail["quests"].as_array().unwrap().len(), 1);
    assert_eq!(detail["quests"][0]["id"], quest_id);
}

#[tokio::test]
async fn update_overwrites_rather_than_adds() {
    let app = spawn_app().await;
    app.signup("elowen").await;
    let created = app.create_character("Sci-Fi", "Vex", "engineer").await;
    let id = created["character"]["id"].as_i64().unwrap();
    let path = format!("/api/character/update/{}", id);
    let stats = json!({
        "strength": 2, "agility": 2, "constitution": 2,
        "wisdom": 2, "intelligence": 2, "charisma": 2,
    });

    app.post(&path, stats.clone()).await;
    let second: Value = app.post(&path, stats).await.json().await.unwrap();
    assert_eq!(second["strength"], 2);
    assert_eq!(second["charisma"], 2);
}

#[tokio::test]
async fn update_requires_all_six_attributes() {
    let app = spawn_app().await;
    app.signup("elowen").await;
    let created = app.create_character("Fantasy", "Elowen", "rogue").await;
    let id = created["character"]["id"].as_i64().unwrap();

    let res = app
        .post(
            &format!("/api/character/update/{}", id),
            json!({ "strength": 3 }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn missing_targets_are_not_found() {
    let app = spawn_app().await;
    app.signup("elowen").await;
    let created = app.create_character("Fantasy", "Elowen", "warrior").await;
    let id = created["character"]["id"].as_i64().unwrap();
    let quest_id = created["scenarios"][0]["id"].as_i64().unwrap();

    let res = app.get("/api/character/9999").await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(error_code(&body), "not_found");

    let res = app
        .post(
            "/api/character/addquest",
            json!({ "characterId": 9999, "questId": quest_id }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = app
        .post(
            "/api/character/addquest",
            json!({ "characterId": id, "questId": 9999 }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = app
        .post(
            "/api/character/update/9999",
            json!({
                "strength": 1, "agility": 1, "constitution": 1,
                "wisdom": 1, "intelligence": 1, "charisma": 1,
            }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    assert_eq!(app.get("/api/class/9999").await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_ids_are_validation_errors() {
    let app = spawn_app().await;

    let get = app.get("/api/character/abc").await;
    let delete = app
        .client
        .delete(app.url("/api/character/abc"))
        .send()
        .await
        .unwrap();
    let update = app
        .post(
            "/api/character/update/abc",
            json!({
                "strength": 1, "agility": 1, "constitution": 1,
                "wisdom": 1, "intelligence": 1, "charisma": 1,
            }),
        )
        .await;
    let overflow = app.get("/api/class/99999999999999999999").await;

    for res in [get, delete, update, overflow] {
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = res.json().await.unwrap();
        assert_eq!(error_code(&body), "validation_failed");
    }
}

#[tokio::test]
async fn delete_removes_the_character() {
    let app = spawn_app().await;
    app.signup("elowen").await;
    let created = app.create_character("Fantasy", "Elowen", "wizard").await;
    let id = created["character"]["id"].as_i64().unwrap();
    let quest_id = created["scenarios"][0]["id"].as_i64().unwrap();
    app.post(
        "/api/character/addquest",
        json!({ "characterId": id, "questId": quest_id }),
    )
    .await;

    let path = format!("/api/character/{}", id);
    let res = app.client.delete(app.url(&path)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    assert_eq!(app.get(&path).await.status(), StatusCode::NOT_FOUND);
    let res = app.client.delete(app.url(&path)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let all: Value = app.get("/api/character").await.json().await.unwrap();
    assert!(all.as_array().unwrap().is_empty());
}

// ============================================================================
// PAGES AND OUTCOMES
// ============================================================================

#[tokio::test]
async fn homepage_shows_the_five_latest_outcomes() {
    let app = spawn_app().await;
    app.signup("elowen").await;

    for n in 1..=6 {
        let res = app
            .post(
                "/api/outcome",
                json!({ "name": format!("Outcome {}", n), "description": "The end" }),
            )
            .await;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let res = app.get("/").await;
    assert_eq!(res.status(), StatusCode::OK);
    let html = res.text().await.unwrap();
    assert!(html.contains("Outcome 6"));
    assert!(html.contains("Outcome 2"));
    assert!(!html.contains("Outcome 1"));
}

#[tokio::test]
async fn creation_page_lists_every_class() {
    let app = spawn_app().await;
    let html = app.get("/create").await.text().await.unwrap();

    for class in ["wizard", "rogue", "warrior", "soldier", "engineer", "scientist"] {
        assert!(html.contains(&format!("value=\"{}\"", class)), "missing {}", class);
    }
}

#[tokio::test]
async fn creation_script_stores_selection_after_loading_the_class() {
    let app = spawn_app().await;
    let html = app.get("/create").await.text().await.unwrap();

    let class_fetch = html.find("fetch('/api/class/'").unwrap();
    let storage_write = html.find("localStorage.setItem('characterId'").unwrap();
    let requests = html.find("Promise.all(").unwrap();
    assert!(class_fetch < storage_write);
    assert!(storage_write < requests);
}
