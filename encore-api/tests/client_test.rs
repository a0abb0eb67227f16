//! API client tests against a stub backend

use axum::{
    extract::{Form, Path, Query},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use encore_api::{ApiClient, ApiClientConfig, NewMarketplaceItem};
use encore_core::EncoreError;
use serde::Deserialize;
use serde_json::{json, Value};

fn student_json() -> Value {
    json!({
        "id": 1,
        "email": "a@x.com",
        "username": "anna",
        "first_name": null,
        "last_name": null,
        "role": "student",
        "is_active": true,
        "created_at": "2026-01-01T00:00:00Z",
        "instruments": []
    })
}

#[derive(Deserialize)]
struct LoginForm {
    username: String,
    password: String,
}

async fn login(Form(form): Form<LoginForm>) -> impl IntoResponse {
    if form.username == "a@x.com" && form.password == "secret" {
        (
            StatusCode::OK,
            Json(json!({
                "access_token": "t1",
                "token_type": "bearer",
                "user": student_json()
            })),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Incorrect email or password"})),
        )
    }
}

async fn me(headers: HeaderMap) -> impl IntoResponse {
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == "Bearer t1")
        .unwrap_or(false);

    if authorized {
        (StatusCode::OK, Json(student_json()))
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Could not validate credentials"})),
        )
    }
}

async fn list_courses() -> Json<Value> {
    Json(json!([{
        "id": 7,
        "title": "Guitare folk",
        "description": null,
        "instrument_id": 3,
        "level": "Débutant",
        "image_url": null,
        "created_at": "2026-02-01T09:00:00Z",
        "instrument": {
            "id": 3,
            "name": "Guitare",
            "description": null,
            "image_url": null,
            "created_at": "2026-01-01T00:00:00Z"
        }
    }]))
}

async fn get_course(Path(course_id): Path<i64>) -> impl IntoResponse {
    match course_id {
        7 => {
            let Json(courses) = list_courses().await;
            (StatusCode::OK, Json(courses[0].clone()))
        }
        _ => (
            StatusCode::NOT_FOUND,
            Json(json!({"detail": "Course not found"})),
        ),
    }
}

#[derive(Deserialize)]
struct MarketQuery {
    #[serde(default)]
    include_sold: bool,
}

async fn list_items(Query(query): Query<MarketQuery>) -> Json<Value> {
    let mut items = vec![json!({
        "id": 1,
        "title": "Violon 3/4",
        "description": null,
        "price": 250.0,
        "image_url": null,
        "seller_id": 1,
        "is_sold": false,
        "created_at": "2026-02-10T08:30:00Z"
    })];
    if query.include_sold {
        items.push(json!({
            "id": 2,
            "title": "Métronome",
            "description": null,
            "price": 15.0,
            "image_url": null,
            "seller_id": 1,
            "is_sold": true,
            "created_at": "2026-02-11T08:30:00Z"
        }));
    }
    Json(Value::Array(items))
}

async fn create_item(headers: HeaderMap, Json(body): Json<Value>) -> impl IntoResponse {
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == "Bearer t1")
        .unwrap_or(false);

    if !authorized {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({"detail": "Not enough permissions"})),
        );
    }

    (
        StatusCode::CREATED,
        Json(json!({
            "id": 3,
            "title": body["title"],
            "description": body["description"],
            "price": body["price"],
            "image_url": body["image_url"],
            "seller_id": 1,
            "is_sold": false,
            "created_at": "2026-02-12T08:30:00Z"
        })),
    )
}

async fn spawn_stub() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let app = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/me", get(me))
        .route("/api/courses/", get(list_courses))
        .route("/api/courses/{id}", get(get_course))
        .route("/api/marketplace/", get(list_items).post(create_item));

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}/api", addr)
}

#[tokio::test]
async fn test_login_returns_token_and_user() {
    let base_url = spawn_stub().await;
    let client = ApiClient::new(ApiClientConfig::new(base_url)).unwrap();

    let token = client.auth.login("a@x.com", "secret").await.unwrap();
    assert_eq!(token.access_token, "t1");
    assert_eq!(token.user.email, "a@x.com");
}

#[tokio::test]
async fn test_login_rejection_is_authentication_error_with_detail() {
    let base_url = spawn_stub().await;
    let client = ApiClient::new(ApiClientConfig::new(base_url)).unwrap();

    let err = client.auth.login("a@x.com", "wrong").await.unwrap_err();
    match err {
        EncoreError::Authentication { message, .. } => {
            assert_eq!(message, "Incorrect email or password");
        }
        other => panic!("Expected Authentication error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_me_with_invalid_token_is_api_401() {
    let base_url = spawn_stub().await;
    let client = ApiClient::new(ApiClientConfig::new(base_url)).unwrap();

    let err = client.auth.me("stale").await.unwrap_err();
    match err {
        EncoreError::Api { status, .. } => assert_eq!(status, 401),
        other => panic!("Expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_course_catalog_and_not_found() {
    let base_url = spawn_stub().await;
    let client = ApiClient::new(ApiClientConfig::new(base_url)).unwrap();

    let courses = client.courses.list().await.unwrap();
    assert_eq!(courses.len(), 1);
    assert_eq!(courses[0].instrument.name, "Guitare");

    let course = client.courses.get(7).await.unwrap();
    assert_eq!(course.title, "Guitare folk");

    let err = client.courses.get(99).await.unwrap_err();
    match err {
        EncoreError::Api { status, message, .. } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Course not found");
        }
        other => panic!("Expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_marketplace_sold_filter_and_admin_gate() {
    let base_url = spawn_stub().await;
    let client = ApiClient::new(ApiClientConfig::new(base_url)).unwrap();

    let unsold = client.marketplace.list(false).await.unwrap();
    assert_eq!(unsold.len(), 1);

    let all = client.marketplace.list(true).await.unwrap();
    assert_eq!(all.len(), 2);
    assert!(all[1].is_sold);

    let item = NewMarketplaceItem {
        title: "Pupitre".to_string(),
        description: None,
        price: 20.0,
        image_url: None,
    };

    let created = client.marketplace.create("t1", &item).await.unwrap();
    assert_eq!(created.title, "Pupitre");

    let err = client.marketplace.create("nope", &item).await.unwrap_err();
    match err {
        EncoreError::Api { status, .. } => assert_eq!(status, 403),
        other => panic!("Expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unreachable_backend_is_network_error() {
    let client = ApiClient::new(
        ApiClientConfig::new("http://127.0.0.1:1/api").with_timeout(2),
    )
    .unwrap();

    let err = client.auth.login("a@x.com", "secret").await.unwrap_err();
    assert!(matches!(err, EncoreError::Network { .. }));
    assert!(err.is_recoverable());
}
