use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use migration::MigratorTrait;
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

use engine::{Engine, Role, UserNew};
use server::{AuthConfig, ServerState, router};

const PASSWORD: &str = "correct horse battery";

struct TestApp {
    app: Router,
    state: ServerState,
}

async fn test_app() -> TestApp {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).build().await.unwrap();
    let state = ServerState::new(
        engine,
        AuthConfig {
            jwt_secret: "integration-test-secret-0123456789abcdef".to_string(),
            token_ttl_minutes: 30,
            cookie_secure: false,
        },
    );
    TestApp {
        app: router(state.clone()),
        state,
    }
}

impl TestApp {
    async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    async fn register(&self, email: &str) -> String {
        let (status, body) = self
            .call(
                Method::POST,
                "/auth/register",
                None,
                Some(json!({ "email": email, "name": "Test", "password": PASSWORD })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["access_token"].as_str().unwrap().to_string()
    }

    async fn admin(&self) -> String {
        self.state
            .engine
            .register_user(UserNew::new("root@example.com", "Root", PASSWORD).role(Role::Admin))
            .await
            .unwrap();
        let (status, body) = self
            .call(
                Method::POST,
                "/auth/login",
                None,
                Some(json!({ "email": "root@example.com", "password": PASSWORD })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["access_token"].as_str().unwrap().to_string()
    }
}

#[tokio::test]
async fn register_login_and_me() {
    let app = test_app().await;
    let token = app.register("ana@example.com").await;

    let (status, me) = app.call(Method::GET, "/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], "ana@example.com");
    assert_eq!(me["role"], "traveler");

    let (status, _) = app
        .call(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "email": "ana@example.com", "password": "wrong password" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .call(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({ "email": "ana@example.com", "name": "Ana", "password": PASSWORD })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn login_sets_the_session_cookie() {
    let app = test_app().await;
    app.register("ana@example.com").await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({ "email": "ana@example.com", "password": PASSWORD }).to_string(),
        ))
        .unwrap();
    let response = app.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("access_token="));
    assert!(cookie.contains("HttpOnly"));

    let pair = cookie.split(';').next().unwrap().to_string();
    let request = Request::builder()
        .uri("/auth/me")
        .header(header::COOKIE, pair)
        .body(Body::empty())
        .unwrap();
    let response = app.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn protected_routes_need_a_valid_token() {
    let app = test_app().await;

    let (status, body) = app.call(Method::GET, "/bookings", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());

    let (status, _) = app
        .call(Method::GET, "/bookings", Some("not-a-jwt"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Catalog reads stay public.
    let (status, body) = app.call(Method::GET, "/packages", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 0);
    assert_eq!(body["per_page"], 20);
}

#[tokio::test]
async fn invalid_bodies_are_rejected_before_the_engine() {
    let app = test_app().await;

    let (status, body) = app
        .call(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({ "email": "not-an-email", "name": "X", "password": "short" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("email"));
}

#[tokio::test]
async fn admin_only_routes_are_forbidden_to_travelers() {
    let app = test_app().await;
    let traveler = app.register("ana@example.com").await;

    let currency = json!({ "code": "EUR", "name": "Euro", "symbol": "€", "minor_units": 2 });
    let (status, _) = app
        .call(Method::POST, "/currencies", Some(&traveler), Some(currency.clone()))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.call(Method::GET, "/users", Some(&traveler), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin = app.admin().await;
    let (status, created) = app
        .call(Method::POST, "/currencies", Some(&admin), Some(currency))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["code"], "EUR");

    let (status, list) = app.call(Method::GET, "/currencies", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn full_booking_flow() {
    let app = test_app().await;
    let admin = app.admin().await;
    let owner = app.register("owner@example.com").await;
    let traveler = app.register("traveler@example.com").await;

    let (_, usd) = app
        .call(
            Method::POST,
            "/currencies",
            Some(&admin),
            Some(json!({ "code": "USD", "name": "US Dollar", "symbol": "$", "minor_units": 2 })),
        )
        .await;
    let (_, country) = app
        .call(
            Method::POST,
            "/countries",
            Some(&admin),
            Some(json!({ "code": "AR", "name": "Argentina" })),
        )
        .await;
    let (status, city) = app
        .call(
            Method::POST,
            "/cities",
            Some(&admin),
            Some(json!({ "country_id": country["id"], "name": "Ushuaia" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{city}");

    let (status, company) = app
        .call(
            Method::POST,
            "/companies",
            Some(&owner),
            Some(json!({ "name": "Fin del Mundo Tours", "email": "hola@fdm.example" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{company}");

    let (status, package) = app
        .call(
            Method::POST,
            "/packages",
            Some(&owner),
            Some(json!({
                "company_id": company["id"],
                "city_id": city["id"],
                "title": "Beagle Channel",
                "description": "Boat trip and penguin colony",
                "duration_days": 2
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{package}");
    let package_id = package["id"].as_str().unwrap().to_string();

    let (status, _) = app
        .call(
            Method::POST,
            &format!("/packages/{package_id}/pricing-options"),
            Some(&traveler),
            Some(json!({
                "label": "Standard",
                "kind": "per_person",
                "price_minor": 25000,
                "currency_id": usd["id"]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, option) = app
        .call(
            Method::POST,
            &format!("/packages/{package_id}/pricing-options"),
            Some(&owner),
            Some(json!({
                "label": "Standard",
                "kind": "per_person",
                "price_minor": 25000,
                "currency_id": usd["id"]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{option}");

    let travel_date = (Utc::now().date_naive() + Duration::days(45)).to_string();
    let (status, quote) = app
        .call(
            Method::POST,
            "/bookings/quote",
            None,
            Some(json!({
                "package_id": package_id,
                "participants": 2,
                "travel_date": travel_date
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{quote}");
    assert_eq!(quote["total_amount_minor"], 50000);
    assert_eq!(quote["commission_amount_minor"], 2500);
    assert_eq!(quote["company_amount_minor"], 47500);

    let (status, booking) = app
        .call(
            Method::POST,
            "/bookings",
            Some(&traveler),
            Some(json!({
                "package_id": package_id,
                "participants": 2,
                "travel_date": travel_date
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{booking}");
    assert_eq!(booking["status"], "pending");
    assert_eq!(booking["pricing_option_id"], option["id"]);
    let booking_id = booking["id"].as_str().unwrap().to_string();

    let (status, _) = app
        .call(
            Method::GET,
            &format!("/bookings/{booking_id}"),
            Some(&owner),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, confirmed) = app
        .call(
            Method::POST,
            &format!("/bookings/{booking_id}/confirm"),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(confirmed["status"], "confirmed");

    let (status, cancelled) = app
        .call(
            Method::POST,
            &format!("/bookings/{booking_id}/cancel"),
            Some(&traveler),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["status"], "cancelled");

    let (status, mine) = app
        .call(Method::GET, "/bookings?per_page=5", Some(&traveler), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine["total"], 1);
    assert_eq!(mine["per_page"], 5);

    let (status, _) = app
        .call(
            Method::DELETE,
            &format!("/packages/{package_id}"),
            Some(&owner),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn activities_are_created_with_nested_schedules() {
    let app = test_app().await;
    let admin = app.admin().await;
    let owner = app.register("owner@example.com").await;

    let (_, usd) = app
        .call(
            Method::POST,
            "/currencies",
            Some(&admin),
            Some(json!({ "code": "USD", "name": "US Dollar", "symbol": "$", "minor_units": 2 })),
        )
        .await;
    let (_, country) = app
        .call(
            Method::POST,
            "/countries",
            Some(&admin),
            Some(json!({ "code": "CL", "name": "Chile" })),
        )
        .await;
    let (_, city) = app
        .call(
            Method::POST,
            "/cities",
            Some(&admin),
            Some(json!({ "country_id": country["id"], "name": "Valparaíso" })),
        )
        .await;
    let (_, company) = app
        .call(
            Method::POST,
            "/companies",
            Some(&owner),
            Some(json!({ "name": "Cerro Tours", "email": "info@cerro.example" })),
        )
        .await;

    let (status, body) = app
        .call(
            Method::POST,
            "/activities",
            Some(&owner),
            Some(json!({
                "company_id": company["id"],
                "city_id": city["id"],
                "currency_id": usd["id"],
                "title": "Street art walk",
                "price_minor": 2000,
                "duration_minutes": 150,
                "schedules": [{ "weekday": 7, "start_time": "10:00:00", "end_time": "12:30:00" }]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");

    let (status, activity) = app
        .call(
            Method::POST,
            "/activities",
            Some(&owner),
            Some(json!({
                "company_id": company["id"],
                "city_id": city["id"],
                "currency_id": usd["id"],
                "title": "Street art walk",
                "price_minor": 2000,
                "duration_minutes": 150,
                "schedules": [{ "weekday": 5, "start_time": "10:00:00", "end_time": "12:30:00" }],
                "features": ["Funicular ride"]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{activity}");
    assert_eq!(activity["schedules"].as_array().unwrap().len(), 1);
    assert_eq!(activity["features"][0]["name"], "Funicular ride");

    let (status, media) = app
        .call(
            Method::POST,
            "/media",
            Some(&owner),
            Some(json!({
                "owner_kind": "activity",
                "owner_id": activity["id"],
                "url": "https://cdn.example.com/murals.jpg"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{media}");

    let (status, found) = app
        .call(Method::GET, "/activities?search=STREET", None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found["total"], 1);
    assert_eq!(found["items"][0]["media"][0]["url"], "https://cdn.example.com/murals.jpg");
}

#[tokio::test]
async fn booking_rule_violations_are_bad_requests() {
    let app = test_app().await;
    let admin = app.admin().await;
    let owner = app.register("owner@example.com").await;

    let (_, usd) = app
        .call(
            Method::POST,
            "/currencies",
            Some(&admin),
            Some(json!({ "code": "USD", "name": "US Dollar", "symbol": "$", "minor_units": 2 })),
        )
        .await;
    let (_, country) = app
        .call(
            Method::POST,
            "/countries",
            Some(&admin),
            Some(json!({ "code": "PE", "name": "Peru" })),
        )
        .await;
    let (_, city) = app
        .call(
            Method::POST,
            "/cities",
            Some(&admin),
            Some(json!({ "country_id": country["id"], "name": "Arequipa" })),
        )
        .await;
    let (_, company) = app
        .call(
            Method::POST,
            "/companies",
            Some(&owner),
            Some(json!({ "name": "Misti Tours", "email": "hola@misti.example" })),
        )
        .await;
    let (_, package) = app
        .call(
            Method::POST,
            "/packages",
            Some(&owner),
            Some(json!({
                "company_id": company["id"],
                "city_id": city["id"],
                "title": "Colca two days",
                "duration_days": 2
            })),
        )
        .await;
    let package_id = package["id"].as_str().unwrap().to_string();
    app.call(
        Method::POST,
        &format!("/packages/{package_id}/pricing-options"),
        Some(&owner),
        Some(json!({
            "label": "Small group",
            "kind": "per_person",
            "price_minor": 9000,
            "currency_id": usd["id"],
            "max_participants": 4
        })),
    )
    .await;

    let yesterday = (Utc::now().date_naive() - Duration::days(1)).to_string();
    let (status, body) = app
        .call(
            Method::POST,
            "/bookings/quote",
            None,
            Some(json!({ "package_id": package_id, "participants": 2, "travel_date": yesterday })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");

    let next_month = (Utc::now().date_naive() + Duration::days(30)).to_string();
    let (status, body) = app
        .call(
            Method::POST,
            "/bookings/quote",
            None,
            Some(json!({ "package_id": package_id, "participants": 6, "travel_date": next_month })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    assert!(body["error"].as_str().unwrap().contains("no pricing option"));
}
