use anyhow::Result;
use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header::CONTENT_TYPE, Request, StatusCode};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower::ServiceExt;

use thunderclash_backend::app::contact::ContactService;
use thunderclash_backend::app::ports::{ImageStore, NotificationSink, TabularSink};
use thunderclash_backend::app::registration::{RegistrationService, SheetTabs};
use thunderclash_backend::error::AppError;
use thunderclash_backend::server::{create_router, AppState};

const UPLOADED_URL: &str = "https://images.example/thunderclash_payments/proof.png";

struct MockImageStore {
    pub uploads: Arc<Mutex<Vec<String>>>,
}

impl MockImageStore {
    fn new() -> Self {
        Self {
            uploads: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl ImageStore for MockImageStore {
    async fn upload(&self, filename: &str, _bytes: Vec<u8>) -> thunderclash_backend::error::Result<String> {
        self.uploads.lock().await.push(filename.to_string());
        Ok(UPLOADED_URL.to_string())
    }
}

struct MockNotifier {
    pub texts: Arc<Mutex<Vec<String>>>,
    pub photos: Arc<Mutex<Vec<(String, String)>>>,
    pub fail: bool,
}

impl MockNotifier {
    fn new(fail: bool) -> Self {
        Self {
            texts: Arc::new(Mutex::new(Vec::new())),
            photos: Arc::new(Mutex::new(Vec::new())),
            fail,
        }
    }
}

#[async_trait]
impl NotificationSink for MockNotifier {
    async fn send_text(&self, text: &str) -> thunderclash_backend::error::Result<()> {
        if self.fail {
            return Err(AppError::Api {
                message: "channel down".to_string(),
            });
        }
        self.texts.lock().await.push(text.to_string());
        Ok(())
    }

    async fn send_photo(&self, photo_url: &str, caption: &str) -> thunderclash_backend::error::Result<()> {
        if self.fail {
            return Err(AppError::Api {
                message: "channel down".to_string(),
            });
        }
        self.photos
            .lock()
            .await
            .push((photo_url.to_string(), caption.to_string()));
        Ok(())
    }
}

struct MockSheet {
    pub rows: Arc<Mutex<Vec<(String, Vec<String>)>>>,
    pub fail: bool,
}

impl MockSheet {
    fn new(fail: bool) -> Self {
        Self {
            rows: Arc::new(Mutex::new(Vec::new())),
            fail,
        }
    }
}

#[async_trait]
impl TabularSink for MockSheet {
    async fn append_row(&self, tab: &str, values: Vec<String>) -> thunderclash_backend::error::Result<()> {
        if self.fail {
            return Err(AppError::Api {
                message: "sheet unavailable".to_string(),
            });
        }
        self.rows.lock().await.push((tab.to_string(), values));
        Ok(())
    }
}

fn test_state(
    images: Arc<MockImageStore>,
    notifier: Arc<MockNotifier>,
    sheet: Option<Arc<MockSheet>>,
    contact: Option<Arc<MockNotifier>>,
) -> AppState {
    let sheet = sheet.map(|sink| {
        (
            sink as Arc<dyn TabularSink>,
            SheetTabs {
                solo: "Solo".to_string(),
                squad: "Squad".to_string(),
            },
        )
    });
    AppState {
        images,
        registrations: Arc::new(RegistrationService::new(notifier, sheet)),
        contact: contact.map(|notifier| {
            Arc::new(ContactService::new(notifier as Arc<dyn NotificationSink>))
        }),
    }
}

const BOUNDARY: &str = "test-boundary-7MA4YWxkTrZu0gW";

fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((filename, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"screenshot\"; filename=\"{filename}\"\r\nContent-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn register_request(fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/register")
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(fields, file)))
        .unwrap()
}

fn solo_fields() -> Vec<(&'static str, &'static str)> {
    vec![
        ("registrationType", "SOLO"),
        ("playerName", "Alex"),
        ("freeFireUID", "12345"),
        ("email", "a@x.com"),
        ("phone", "9990001111"),
        ("paymentMethod", "UPI"),
    ]
}

async fn response_json(response: axum::response::Response) -> Result<serde_json::Value> {
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[tokio::test]
async fn solo_registration_succeeds() -> Result<()> {
    let images = Arc::new(MockImageStore::new());
    let notifier = Arc::new(MockNotifier::new(false));
    let photos = notifier.photos.clone();

    let app = create_router(test_state(images, notifier, None, None));
    let response = app
        .oneshot(register_request(&solo_fields(), Some(("proof.png", b"fakepng"))))
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["imageUrl"], UPLOADED_URL);

    let photos = photos.lock().await;
    assert_eq!(photos.len(), 1);
    assert_eq!(photos[0].0, UPLOADED_URL);
    assert!(photos[0].1.contains("Alex"));
    assert!(photos[0].1.contains("12345"));
    Ok(())
}

#[tokio::test]
async fn squad_registration_lists_roster_in_order() -> Result<()> {
    let images = Arc::new(MockImageStore::new());
    let notifier = Arc::new(MockNotifier::new(false));
    let photos = notifier.photos.clone();

    let mut fields = solo_fields();
    fields[0] = ("registrationType", "SQUAD");
    fields.push(("teammate1UID", "T1"));
    fields.push(("teammate2UID", "T2"));
    fields.push(("teammate3UID", "T3"));

    let app = create_router(test_state(images, notifier, None, None));
    let response = app
        .oneshot(register_request(&fields, Some(("proof.png", b"fakepng"))))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let photos = photos.lock().await;
    let caption = &photos[0].1;
    let positions: Vec<usize> = ["12345", "T1", "T2", "T3"]
        .iter()
        .map(|uid| caption.find(*uid).expect("uid missing from caption"))
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "roster out of order");
    Ok(())
}

#[tokio::test]
async fn missing_screenshot_is_rejected_without_sink_calls() -> Result<()> {
    let images = Arc::new(MockImageStore::new());
    let notifier = Arc::new(MockNotifier::new(false));
    let sheet = Arc::new(MockSheet::new(false));
    let uploads = images.uploads.clone();
    let photos = notifier.photos.clone();
    let rows = sheet.rows.clone();

    let app = create_router(test_state(images, notifier, Some(sheet), None));
    let response = app.oneshot(register_request(&solo_fields(), None)).await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await?;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Payment screenshot is required");

    assert!(uploads.lock().await.is_empty());
    assert!(photos.lock().await.is_empty());
    assert!(rows.lock().await.is_empty());
    Ok(())
}

#[tokio::test]
async fn notifier_failure_is_a_generic_server_error() -> Result<()> {
    let images = Arc::new(MockImageStore::new());
    let notifier = Arc::new(MockNotifier::new(true));

    let app = create_router(test_state(images, notifier, None, None));
    let response = app
        .oneshot(register_request(&solo_fields(), Some(("proof.png", b"fakepng"))))
        .await?;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = response_json(response).await?;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Server error");
    Ok(())
}

#[tokio::test]
async fn sheet_failure_does_not_fail_the_registration() -> Result<()> {
    let images = Arc::new(MockImageStore::new());
    let notifier = Arc::new(MockNotifier::new(false));
    let sheet = Arc::new(MockSheet::new(true));

    let app = create_router(test_state(images, notifier, Some(sheet), None));
    let response = app
        .oneshot(register_request(&solo_fields(), Some(("proof.png", b"fakepng"))))
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await?;
    assert_eq!(body["success"], true);
    Ok(())
}

#[tokio::test]
async fn solo_rows_are_logged_to_the_solo_tab() -> Result<()> {
    let images = Arc::new(MockImageStore::new());
    let notifier = Arc::new(MockNotifier::new(false));
    let sheet = Arc::new(MockSheet::new(false));
    let rows = sheet.rows.clone();

    let app = create_router(test_state(images, notifier, Some(sheet), None));
    let response = app
        .oneshot(register_request(&solo_fields(), Some(("proof.png", b"fakepng"))))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let rows = rows.lock().await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].0, "Solo");
    assert!(rows[0].1.contains(&"Alex".to_string()));
    assert!(rows[0].1.contains(&UPLOADED_URL.to_string()));
    Ok(())
}

#[tokio::test]
async fn unknown_registration_type_is_treated_as_solo() -> Result<()> {
    let images = Arc::new(MockImageStore::new());
    let notifier = Arc::new(MockNotifier::new(false));
    let photos = notifier.photos.clone();

    let mut fields = solo_fields();
    fields[0] = ("registrationType", "DUO");

    let app = create_router(test_state(images, notifier, None, None));
    let response = app
        .oneshot(register_request(&fields, Some(("proof.png", b"fakepng"))))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let photos = photos.lock().await;
    assert!(photos[0].1.contains("SOLO REGISTRATION"));
    Ok(())
}

#[tokio::test]
async fn squad_without_teammates_is_a_validation_error() -> Result<()> {
    let images = Arc::new(MockImageStore::new());
    let notifier = Arc::new(MockNotifier::new(false));
    let photos = notifier.photos.clone();

    let mut fields = solo_fields();
    fields[0] = ("registrationType", "SQUAD");

    let app = create_router(test_state(images, notifier, None, None));
    let response = app
        .oneshot(register_request(&fields, Some(("proof.png", b"fakepng"))))
        .await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await?;
    assert_eq!(body["success"], false);
    assert!(photos.lock().await.is_empty());
    Ok(())
}

#[tokio::test]
async fn contact_without_configured_bot_is_a_config_error() -> Result<()> {
    let images = Arc::new(MockImageStore::new());
    let notifier = Arc::new(MockNotifier::new(false));

    let app = create_router(test_state(images, notifier, None, None));
    let request = Request::builder()
        .method("POST")
        .uri("/contact")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(
            serde_json::json!({
                "name": "Sam",
                "phone": "8880002222",
                "uid": "98765",
                "message": "My payment failed"
            })
            .to_string(),
        ))?;
    let response = app.oneshot(request).await?;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = response_json(response).await?;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Support bot not configured.");
    Ok(())
}

#[tokio::test]
async fn contact_forwards_the_ticket() -> Result<()> {
    let images = Arc::new(MockImageStore::new());
    let notifier = Arc::new(MockNotifier::new(false));
    let contact = Arc::new(MockNotifier::new(false));
    let texts = contact.texts.clone();

    let app = create_router(test_state(images, notifier, None, Some(contact)));
    let request = Request::builder()
        .method("POST")
        .uri("/contact")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(
            serde_json::json!({
                "name": "Sam",
                "phone": "8880002222",
                "uid": "98765",
                "message": "My payment failed"
            })
            .to_string(),
        ))?;
    let response = app.oneshot(request).await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Message sent successfully!");

    let texts = texts.lock().await;
    assert_eq!(texts.len(), 1);
    assert!(texts[0].contains("Sam"));
    assert!(texts[0].contains("My payment failed"));
    Ok(())
}

#[tokio::test]
async fn wakeup_responds_with_plain_text() -> Result<()> {
    let images = Arc::new(MockImageStore::new());
    let notifier = Arc::new(MockNotifier::new(false));

    let app = create_router(test_state(images, notifier, None, None));
    let request = Request::builder().uri("/wakeup").body(Body::empty())?;
    let response = app.oneshot(request).await?;

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    assert_eq!(&bytes[..], b"Server is awake and ready!");
    Ok(())
}
