//! Run with
//!
//! ```not_rust
//! TARGET_AUDIENCE=https://api.contoso.com cargo run --example axum
//! ```

use axum::{
    Router,
    extract::{Request, State},
    http::{StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
    routing::post,
};
use actionable_token::TokenValidator;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Clone)]
struct AppState {
    validator: TokenValidator,
    audience: String,
}

/// Identities of a verified actionable message
#[derive(Clone)]
struct ActionPerformer {
    user: String,
    sender: Option<String>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("{}=debug,actionable_token=debug", env!("CARGO_CRATE_NAME")).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let audience =
        std::env::var("TARGET_AUDIENCE").unwrap_or_else(|_| "https://api.contoso.com".into());
    let validator = TokenValidator::office365(reqwest::Client::new());

    let state = AppState {
        validator,
        audience,
    };

    let app = Router::new()
        .route("/api/expense/approve", post(handler))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            actionable_auth_middleware,
        ))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:4000")
        .await
        .unwrap();
    tracing::debug!("listening on {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.unwrap();
}

async fn actionable_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let auth_str = auth_header.to_str().map_err(|_| StatusCode::BAD_REQUEST)?;

    let token_str = auth_str
        .strip_prefix("Bearer ")
        .ok_or(StatusCode::UNAUTHORIZED)?;

    tracing::debug!("Validating actionable message token");

    let result = state
        .validator
        .validate(token_str, &state.audience)
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    let (user, sender) = result.into_result().map_err(|e| {
        tracing::warn!("Actionable message token rejected: {e}");
        StatusCode::UNAUTHORIZED
    })?;

    request
        .extensions_mut()
        .insert(ActionPerformer { user, sender });

    Ok(next.run(request).await)
}

async fn handler(
    axum::extract::Extension(performer): axum::extract::Extension<ActionPerformer>,
) -> String {
    let sender = performer.sender.as_deref().unwrap_or("unknown");
    format!(
        "Expense approved by {} (message sent by {sender})",
        performer.user
    )
}
