//! In-process stub backend for session tests
//!
//! Serves the auth router shapes the real backend exposes, against a
//! seeded set of accounts. Tokens are opaque strings; revoking them all
//! simulates expiry.

use axum::{
    extract::{Form, Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

#[derive(Clone)]
struct Account {
    id: i64,
    password: String,
    role: String,
    username: String,
    instruments: BTreeSet<i64>,
}

struct Inner {
    accounts: HashMap<String, Account>,
    /// token -> account email
    tokens: HashMap<String, String>,
    next_token: u64,
    next_user_id: i64,
}

#[derive(Clone)]
pub struct StubBackend {
    inner: Arc<Mutex<Inner>>,
    pub base_url: String,
}

#[derive(Deserialize)]
struct LoginForm {
    username: String,
    password: String,
}

#[derive(Deserialize)]
struct RegisterBody {
    username: String,
    email: String,
    password: String,
}

fn profile_json(email: &str, account: &Account) -> Value {
    let instruments: Vec<Value> = account
        .instruments
        .iter()
        .map(|id| {
            json!({
                "id": id,
                "name": format!("Instrument {}", id),
                "description": null,
                "image_url": null,
                "created_at": "2026-01-01T00:00:00Z"
            })
        })
        .collect();

    json!({
        "id": account.id,
        "email": email,
        "username": account.username,
        "first_name": null,
        "last_name": null,
        "role": account.role,
        "is_active": true,
        "created_at": "2026-01-01T00:00:00Z",
        "instruments": instruments
    })
}

fn bearer_of(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_string)
}

async fn login(
    State(stub): State<StubBackend>,
    Form(form): Form<LoginForm>,
) -> impl IntoResponse {
    let mut inner = stub.inner.lock().unwrap();

    let account = match inner.accounts.get(&form.username) {
        Some(account) if account.password == form.password => account.clone(),
        _ => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({"detail": "Incorrect email or password"})),
            );
        }
    };

    inner.next_token += 1;
    let token = format!("t{}", inner.next_token);
    inner.tokens.insert(token.clone(), form.username.clone());

    (
        StatusCode::OK,
        Json(json!({
            "access_token": token,
            "token_type": "bearer",
            "user": profile_json(&form.username, &account)
        })),
    )
}

async fn register(
    State(stub): State<StubBackend>,
    Json(body): Json<RegisterBody>,
) -> impl IntoResponse {
    let mut inner = stub.inner.lock().unwrap();

    if inner.accounts.contains_key(&body.email) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"detail": "Email already registered"})),
        );
    }

    inner.next_user_id += 1;
    let account = Account {
        id: inner.next_user_id,
        password: body.password,
        role: "student".to_string(),
        username: body.username,
        instruments: BTreeSet::new(),
    };
    inner.accounts.insert(body.email.clone(), account.clone());

    (StatusCode::CREATED, Json(profile_json(&body.email, &account)))
}

async fn me(State(stub): State<StubBackend>, headers: HeaderMap) -> impl IntoResponse {
    let inner = stub.inner.lock().unwrap();

    let email = bearer_of(&headers).and_then(|token| inner.tokens.get(&token).cloned());
    match email.and_then(|email| inner.accounts.get(&email).cloned().map(|a| (email, a))) {
        Some((email, account)) => {
            (StatusCode::OK, Json(profile_json(&email, &account)))
        }
        None => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Could not validate credentials"})),
        ),
    }
}

async fn add_instrument(
    State(stub): State<StubBackend>,
    Path(instrument_id): Path<i64>,
    headers: HeaderMap,
) -> impl IntoResponse {
    modify_instrument(stub, headers, instrument_id, true)
}

async fn remove_instrument(
    State(stub): State<StubBackend>,
    Path(instrument_id): Path<i64>,
    headers: HeaderMap,
) -> impl IntoResponse {
    modify_instrument(stub, headers, instrument_id, false)
}

fn modify_instrument(
    stub: StubBackend,
    headers: HeaderMap,
    instrument_id: i64,
    add: bool,
) -> (StatusCode, Json<Value>) {
    let mut inner = stub.inner.lock().unwrap();

    let email = match bearer_of(&headers).and_then(|token| inner.tokens.get(&token).cloned()) {
        Some(email) => email,
        None => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({"detail": "Could not validate credentials"})),
            );
        }
    };

    if let Some(account) = inner.accounts.get_mut(&email) {
        if add {
            account.instruments.insert(instrument_id);
        } else {
            account.instruments.remove(&instrument_id);
        }
    }

    (StatusCode::OK, Json(json!({"message": "ok"})))
}

impl StubBackend {
    /// Bind on an ephemeral port and serve the auth router
    pub async fn spawn() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let stub = StubBackend {
            inner: Arc::new(Mutex::new(Inner {
                accounts: HashMap::new(),
                tokens: HashMap::new(),
                next_token: 0,
                next_user_id: 0,
            })),
            base_url: format!("http://{}/api", addr),
        };

        let app = Router::new()
            .route("/api/auth/login", post(login))
            .route("/api/auth/register", post(register))
            .route("/api/auth/me", get(me))
            .route(
                "/api/auth/me/instruments/{id}",
                post(add_instrument).delete(remove_instrument),
            )
            .with_state(stub.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        stub
    }

    /// Seed an account with a fixed role
    pub fn seed_account(&self, email: &str, password: &str, role: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.next_user_id += 1;
        let id = inner.next_user_id;
        inner.accounts.insert(
            email.to_string(),
            Account {
                id,
                password: password.to_string(),
                role: role.to_string(),
                username: email.split('@').next().unwrap_or("user").to_string(),
                instruments: BTreeSet::new(),
            },
        );
    }

    /// Invalidate every issued token, simulating expiry
    pub fn revoke_all_tokens(&self) {
        self.inner.lock().unwrap().tokens.clear();
    }

    /// Instrument ids currently associated with an account
    pub fn instruments_of(&self, email: &str) -> Vec<i64> {
        self.inner
            .lock()
            .unwrap()
            .accounts
            .get(email)
            .map(|a| a.instruments.iter().copied().collect())
            .unwrap_or_default()
    }
}
