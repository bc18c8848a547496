use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::{Method, StatusCode},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use crate::app::contact::ContactService;
use crate::app::ports::ImageStore;
use crate::app::registration::RegistrationService;
use crate::domain::{ContactTicket, RegistrationForm, RegistrationSubmission};
use crate::error::AppError;

/// Screenshots come straight off phones, so allow a little headroom over
/// the axum default body limit.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Everything the handlers need, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub images: Arc<dyn ImageStore>,
    pub registrations: Arc<RegistrationService>,
    pub contact: Option<Arc<ContactService>>,
}

#[derive(Serialize)]
pub struct ApiResponse {
    success: bool,
    message: String,
    #[serde(rename = "imageUrl", skip_serializing_if = "Option::is_none")]
    image_url: Option<String>,
}

impl ApiResponse {
    fn ok(message: &str) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            image_url: None,
        }
    }

    fn ok_with_image(message: &str, image_url: String) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            image_url: Some(image_url),
        }
    }

    fn fail(message: &str) -> Self {
        Self {
            success: false,
            message: message.to_string(),
            image_url: None,
        }
    }
}

/// Create the HTTP server with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route("/wakeup", get(wakeup))
        .route("/contact", post(contact))
        .route("/register", post(register))
        .layer(cors)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

/// Start the HTTP server on the specified port
pub async fn start_server(state: AppState, port: u16) -> anyhow::Result<()> {
    let app = create_router(state);
    let addr = format!("0.0.0.0:{port}");

    println!("⚡ Server running on http://{addr}");
    println!("💚 Liveness:     http://{addr}/wakeup");
    println!("📝 Registration: http://{addr}/register");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Liveness endpoint, used to pre-warm cold-started instances
async fn wakeup() -> &'static str {
    info!("Wake-up ping received");
    "Server is awake and ready!"
}

/// Support-form endpoint
async fn contact(
    State(state): State<AppState>,
    Json(ticket): Json<ContactTicket>,
) -> (StatusCode, Json<ApiResponse>) {
    let Some(service) = &state.contact else {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::fail("Support bot not configured.")),
        );
    };

    match service.handle(&ticket).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::ok("Message sent successfully!")),
        ),
        Err(err) => {
            error!(error = %err, "Contact error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::fail("Failed to send message.")),
            )
        }
    }
}

/// Registration endpoint: multipart form with a `screenshot` file part plus
/// the player/squad text fields.
async fn register(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> (StatusCode, Json<ApiResponse>) {
    let (form, screenshot) = match collect_form(&mut multipart).await {
        Ok(parts) => parts,
        Err(err) => {
            error!(error = %err, "Rejected unreadable registration form");
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::fail("Malformed form data")),
            );
        }
    };

    // Nothing has touched the network yet; a missing file exits here.
    let Some((filename, bytes)) = screenshot else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::fail("Payment screenshot is required")),
        );
    };

    let image_url = match state.images.upload(&filename, bytes).await {
        Ok(url) => url,
        Err(err) => return error_response(err),
    };

    let submission = match RegistrationSubmission::from_form(form, image_url.clone()) {
        Ok(submission) => submission,
        Err(err) => return error_response(err),
    };

    match state.registrations.handle(&submission).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::ok_with_image("Registration successful!", image_url)),
        ),
        Err(err) => error_response(err),
    }
}

/// Drains the multipart stream into the raw form plus the screenshot bytes.
async fn collect_form(
    multipart: &mut Multipart,
) -> Result<(RegistrationForm, Option<(String, Vec<u8>)>), AppError> {
    let mut form = RegistrationForm::default();
    let mut screenshot = None;

    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        match field.name().map(str::to_string) {
            Some(name) if name == "screenshot" => {
                let filename = field.file_name().unwrap_or("screenshot.jpg").to_string();
                let bytes = field.bytes().await.map_err(bad_multipart)?.to_vec();
                screenshot = Some((filename, bytes));
            }
            Some(name) => {
                let value = field.text().await.map_err(bad_multipart)?;
                form.set_field(&name, value);
            }
            None => {}
        }
    }

    Ok((form, screenshot))
}

fn bad_multipart(err: axum::extract::multipart::MultipartError) -> AppError {
    AppError::Validation(format!("Malformed multipart body: {err}"))
}

/// Maps an error to the uniform response shape. Validation problems carry
/// their message to the caller; everything else is logged in full and
/// surfaced as a generic server error.
fn error_response(err: AppError) -> (StatusCode, Json<ApiResponse>) {
    match err {
        AppError::Validation(message) => {
            (StatusCode::BAD_REQUEST, Json(ApiResponse::fail(&message)))
        }
        AppError::Config(message) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::fail(&message)),
        ),
        err => {
            error!(error = %err, "Server error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::fail("Server error")),
            )
        }
    }
}
