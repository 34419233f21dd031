//! API client for the Sentinela backend.
//!
//! `AppClient` wraps a single shared `reqwest::Client` pointed at a
//! fixed base URL. Every request reads the current token from the
//! session and attaches it as a bearer header before dispatch; a 401
//! response notifies the unauthorized observer exactly once and is
//! still returned to the caller as `ApiError::Unauthorized`. The
//! client never retries and never mutates session state.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use futures::future;
use reqwest::{multipart, Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::auth::Session;
use crate::models::{
    AuthTokens, AuthUser, Comment, CommentWithOwner, Complaint, CreateComment, CreateComplaint,
    CreateForum, CreateUser, Forum, ForumWithOwner, User,
};
use crate::router::UnauthorizedObserver;

use super::{ApiError, ApiResult};

/// HTTP request timeout in seconds.
/// 30s allows for slow mobile networks while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// One file for a multipart upload
#[derive(Debug, Clone)]
pub struct ImagePart {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub mime_type: String,
}

impl ImagePart {
    pub fn new(bytes: Vec<u8>, file_name: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            file_name: file_name.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Read a part from disk, guessing the mime type from the extension
    pub async fn from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read image {}", path.display()))?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image")
            .to_string();
        let mime_type = mime_for_extension(path.extension().and_then(|e| e.to_str())).to_string();
        Ok(Self {
            bytes,
            file_name,
            mime_type,
        })
    }

    fn into_part(self) -> ApiResult<multipart::Part> {
        Ok(multipart::Part::bytes(self.bytes)
            .file_name(self.file_name)
            .mime_str(&self.mime_type)?)
    }
}

/// Read several images concurrently for a single multipart request
pub async fn read_image_parts(paths: &[PathBuf]) -> anyhow::Result<Vec<ImagePart>> {
    future::try_join_all(paths.iter().map(ImagePart::from_path)).await
}

fn mime_for_extension(ext: Option<&str>) -> &'static str {
    match ext.map(|e| e.to_ascii_lowercase()).as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("heic") => "image/heic",
        _ => "application/octet-stream",
    }
}

/// API client for the Sentinela backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct AppClient {
    client: Client,
    base_url: String,
    session: Arc<Session>,
    unauthorized: Option<Arc<dyn UnauthorizedObserver>>,
}

impl AppClient {
    pub fn new(base_url: impl Into<String>, session: Arc<Session>) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
            unauthorized: None,
        })
    }

    /// Attach the observer notified on 401 responses
    pub fn with_unauthorized_observer(mut self, observer: Arc<dyn UnauthorizedObserver>) -> Self {
        self.unauthorized = Some(observer);
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach the bearer token, when one is present, before dispatch
    async fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.token().await {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Map a non-success response to a tagged error. A 401 notifies the
    /// unauthorized observer once; the error still goes to the caller.
    async fn check_response(&self, response: Response) -> ApiResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED {
            if let Some(ref observer) = self.unauthorized {
                observer.on_unauthorized();
            }
        }

        let body = response.text().await.unwrap_or_default();
        debug!(status = %status, "Request failed");
        Err(ApiError::from_status(status, &body))
    }

    async fn send(&self, request: RequestBuilder) -> ApiResult<Response> {
        let request = self.authorize(request).await;
        let response = request.send().await?;
        self.check_response(response).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let response = self.send(self.client.get(self.url(path))).await?;
        Ok(response.json().await?)
    }

    async fn post_json<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let request = self.client.post(self.url(path)).json(body);
        let response = self.send(request).await?;
        Ok(response.json().await?)
    }

    // ===== Accounts =====

    /// Create an account (POST /users)
    pub async fn create_user(&self, data: &CreateUser) -> ApiResult<User> {
        self.post_json("/users", data).await
    }

    /// List all users (GET /users, admin/debug)
    pub async fn list_all_users(&self) -> ApiResult<Vec<User>> {
        self.get_json("/users").await
    }

    /// Authenticate (POST /auth). The caller decides whether to turn
    /// the returned tokens into a session sign-in.
    pub async fn auth_user(&self, data: &AuthUser) -> ApiResult<AuthTokens> {
        self.post_json("/auth", data).await
    }

    /// Fetch the signed-in user's profile (PATCH /users/authenticated)
    pub async fn get_user_authenticated(&self) -> ApiResult<User> {
        let request = self.client.patch(self.url("/users/authenticated"));
        let response = self.send(request).await?;
        Ok(response.json().await?)
    }

    /// Replace the signed-in user's avatar (PATCH /users/avatar).
    /// The multipart field name is chosen by the caller, typically "avatar".
    pub async fn upload_user_avatar(&self, field: &str, image: ImagePart) -> ApiResult<()> {
        let form = multipart::Form::new().part(field.to_owned(), image.into_part()?);
        let request = self.client.patch(self.url("/users/avatar")).multipart(form);
        self.send(request).await?;
        Ok(())
    }

    /// Fetch the signed-in user's avatar as raw bytes (PATCH /files/avatar)
    pub async fn get_user_avatar(&self) -> ApiResult<Vec<u8>> {
        let request = self.client.patch(self.url("/files/avatar"));
        let response = self.send(request).await?;
        Ok(response.bytes().await?.to_vec())
    }

    // ===== Forums =====

    /// Create a forum post (POST /forums)
    pub async fn create_forum(&self, data: &CreateForum) -> ApiResult<Forum> {
        self.post_json("/forums", data).await
    }

    /// List forums for a city (GET /forums/citys/:cityId).
    /// The path spelling is the backend's.
    pub async fn get_forums_by_city(&self, city_id: &str) -> ApiResult<Vec<Forum>> {
        self.get_json(&format!("/forums/citys/{}", city_id)).await
    }

    /// Fetch one forum with its owner's name (GET /forums/:id)
    pub async fn get_forum_by_id(&self, id: &str) -> ApiResult<ForumWithOwner> {
        self.get_json(&format!("/forums/{}", id)).await
    }

    /// Comment on a forum (POST /forums/comments)
    pub async fn create_comment(&self, data: &CreateComment) -> ApiResult<Comment> {
        self.post_json("/forums/comments", data).await
    }

    /// List a forum's comments with their owners (GET /forums/:forumId/comments)
    pub async fn get_comments_by_forum(&self, forum_id: &str) -> ApiResult<Vec<CommentWithOwner>> {
        self.get_json(&format!("/forums/{}/comments", forum_id)).await
    }

    /// Delete a comment (DELETE /forums/comments/:id)
    pub async fn remove_comment(&self, id: &str) -> ApiResult<()> {
        let request = self.client.delete(self.url(&format!("/forums/comments/{}", id)));
        self.send(request).await?;
        Ok(())
    }

    // ===== Complaints =====

    /// Create a complaint (POST /complaints). Images are attached in a
    /// second call once the server has assigned an id.
    pub async fn create_complaint(&self, data: &CreateComplaint) -> ApiResult<Complaint> {
        self.post_json("/complaints", data).await
    }

    /// Attach images to an existing complaint
    /// (POST /complaints/images/:complaintId). Multiple files go in one
    /// request under the caller-specified field name, typically "images".
    pub async fn upload_complaint_images(
        &self,
        field: &str,
        images: Vec<ImagePart>,
        complaint_id: &str,
    ) -> ApiResult<()> {
        let mut form = multipart::Form::new();
        for image in images {
            form = form.part(field.to_owned(), image.into_part()?);
        }
        let request = self
            .client
            .post(self.url(&format!("/complaints/images/{}", complaint_id)))
            .multipart(form);
        self.send(request).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    use crate::auth::{Credentials, Session, SessionStatus, TokenStore};
    use crate::router::{LoginRedirect, Route, Router};

    // A minimal one-connection-per-response HTTP server. Each entry in
    // `responses` answers one request; captured raw requests come back
    // through the join handle.
    async fn spawn_server(
        responses: Vec<(&'static str, &'static str)>,
    ) -> (String, JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let mut captured = Vec::new();
            for (status_line, body) in responses {
                let (mut stream, _) = listener.accept().await.unwrap();
                let raw = read_request(&mut stream).await;
                let response = format!(
                    "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                    status_line,
                    body.len(),
                    body
                );
                stream.write_all(response.as_bytes()).await.unwrap();
                stream.shutdown().await.ok();
                captured.push(raw);
            }
            captured
        });
        (format!("http://{}", addr), handle)
    }

    async fn read_request(stream: &mut TcpStream) -> String {
        let mut raw = Vec::new();
        let mut buf = [0u8; 8192];
        loop {
            let n = stream.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            raw.extend_from_slice(&buf[..n]);
            if request_complete(&raw) {
                break;
            }
        }
        String::from_utf8_lossy(&raw).into_owned()
    }

    fn request_complete(raw: &[u8]) -> bool {
        let Some(split) = raw.windows(4).position(|w| w == b"\r\n\r\n") else {
            return false;
        };
        let headers = String::from_utf8_lossy(&raw[..split]).into_owned();
        let content_length = headers
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                if name.eq_ignore_ascii_case("content-length") {
                    value.trim().parse::<usize>().ok()
                } else {
                    None
                }
            })
            .unwrap_or(0);
        raw.len() >= split + 4 + content_length
    }

    async fn hydrated_session(dir: &tempfile::TempDir) -> Arc<Session> {
        let session = Arc::new(Session::new(TokenStore::new(dir.path().to_path_buf())));
        session.hydrate().await;
        session
    }

    #[derive(Default)]
    struct RecordingRouter {
        calls: Mutex<Vec<Route>>,
    }

    impl Router for RecordingRouter {
        fn replace(&self, route: Route) {
            self.calls.lock().unwrap().push(route);
        }
    }

    struct CountingObserver {
        count: AtomicUsize,
    }

    impl UnauthorizedObserver for CountingObserver {
        fn on_unauthorized(&self) {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn bearer_header_attached_when_signed_in() {
        let (base, handle) = spawn_server(vec![("200 OK", "[]")]).await;
        let dir = tempfile::tempdir().unwrap();
        let session = hydrated_session(&dir).await;
        session.sign_in(Credentials::new("tok123", "u1")).await;

        let client = AppClient::new(base, session).unwrap();
        let forums = client.get_forums_by_city("3550308").await.unwrap();
        assert!(forums.is_empty());

        let requests = handle.await.unwrap();
        let request = requests[0].to_lowercase();
        assert!(request.starts_with("get /forums/citys/3550308 http/1.1"));
        assert!(request.contains("authorization: bearer tok123"));
    }

    #[tokio::test]
    async fn no_authorization_header_when_signed_out() {
        let (base, handle) = spawn_server(vec![("200 OK", "[]")]).await;
        let dir = tempfile::tempdir().unwrap();
        let session = hydrated_session(&dir).await;
        assert_eq!(session.status().await, SessionStatus::SignedOut);

        let client = AppClient::new(base, session).unwrap();
        client.get_forums_by_city("3550308").await.unwrap();

        let requests = handle.await.unwrap();
        assert!(!requests[0].to_lowercase().contains("authorization:"));
    }

    #[tokio::test]
    async fn unauthorized_response_redirects_to_login_once() {
        let (base, _handle) = spawn_server(vec![("401 Unauthorized", "{}")]).await;
        let dir = tempfile::tempdir().unwrap();
        let session = hydrated_session(&dir).await;
        session.sign_in(Credentials::new("expired", "u1")).await;

        let router = Arc::new(RecordingRouter::default());
        let client = AppClient::new(base, session.clone())
            .unwrap()
            .with_unauthorized_observer(Arc::new(LoginRedirect::new(router.clone())));

        let err = client.get_user_authenticated().await.unwrap_err();
        assert!(err.is_unauthorized());

        // Exactly one navigation call, and the session itself is untouched
        assert_eq!(*router.calls.lock().unwrap(), vec![Route::Login]);
        assert_eq!(session.status().await, SessionStatus::SignedIn);
    }

    #[tokio::test]
    async fn unauthorized_notifies_observer_exactly_once_per_response() {
        let (base, _handle) = spawn_server(vec![("401 Unauthorized", "{}")]).await;
        let dir = tempfile::tempdir().unwrap();
        let session = hydrated_session(&dir).await;

        let observer = Arc::new(CountingObserver {
            count: AtomicUsize::new(0),
        });
        let client = AppClient::new(base, session)
            .unwrap()
            .with_unauthorized_observer(observer.clone());

        let err = client.remove_comment("c1").await.unwrap_err();
        assert!(err.is_unauthorized());
        assert_eq!(observer.count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn sign_in_flow_authenticates_then_carries_token() {
        let (base, handle) = spawn_server(vec![
            ("200 OK", r#"{"accessToken":"tok123","id":"u1"}"#),
            ("200 OK", "[]"),
        ])
        .await;
        let dir = tempfile::tempdir().unwrap();
        let session = hydrated_session(&dir).await;
        let client = AppClient::new(base, session.clone()).unwrap();

        let tokens = client
            .auth_user(&AuthUser {
                email: "a@b.com".into(),
                password: "secret1".into(),
            })
            .await
            .unwrap();
        session
            .sign_in(Credentials::new(tokens.access_token, tokens.id))
            .await;
        assert_eq!(session.status().await, SessionStatus::SignedIn);

        client.get_forums_by_city("3550308").await.unwrap();

        let requests = handle.await.unwrap();
        let auth_request = requests[0].to_lowercase();
        assert!(auth_request.starts_with("post /auth http/1.1"));
        assert!(auth_request.contains("a@b.com"));
        assert!(!auth_request.contains("authorization:"));

        let forums_request = requests[1].to_lowercase();
        assert!(forums_request.contains("authorization: bearer tok123"));
    }

    #[tokio::test]
    async fn complaint_images_upload_uses_caller_field_name() {
        let (base, handle) = spawn_server(vec![("200 OK", "{}")]).await;
        let dir = tempfile::tempdir().unwrap();
        let session = hydrated_session(&dir).await;
        session.sign_in(Credentials::new("tok123", "u1")).await;

        let client = AppClient::new(base, session).unwrap();
        let images = vec![
            ImagePart::new(b"fakejpegdata".to_vec(), "scene1.jpg", "image/jpeg"),
            ImagePart::new(b"fakepngdata".to_vec(), "scene2.png", "image/png"),
        ];
        client
            .upload_complaint_images("images", images, "c42")
            .await
            .unwrap();

        let request = handle.await.unwrap().remove(0);
        assert!(request
            .to_lowercase()
            .starts_with("post /complaints/images/c42 http/1.1"));
        assert_eq!(request.matches("name=\"images\"").count(), 2);
        assert!(request.contains("filename=\"scene1.jpg\""));
        assert!(request.contains("filename=\"scene2.png\""));
        assert!(request.contains("image/jpeg"));
    }

    #[tokio::test]
    async fn server_errors_carry_the_response_body() {
        let (base, _handle) = spawn_server(vec![("500 Internal Server Error", "boom")]).await;
        let dir = tempfile::tempdir().unwrap();
        let session = hydrated_session(&dir).await;

        let client = AppClient::new(base, session).unwrap();
        match client.list_all_users().await {
            Err(ApiError::ServerError(body)) => assert_eq!(body, "boom"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn avatar_fetch_returns_raw_bytes() {
        let (base, handle) = spawn_server(vec![("200 OK", "rawbytes")]).await;
        let dir = tempfile::tempdir().unwrap();
        let session = hydrated_session(&dir).await;
        session.sign_in(Credentials::new("tok123", "u1")).await;

        let client = AppClient::new(base, session).unwrap();
        let bytes = client.get_user_avatar().await.unwrap();
        assert_eq!(bytes, b"rawbytes");

        let request = handle.await.unwrap().remove(0).to_lowercase();
        assert!(request.starts_with("patch /files/avatar http/1.1"));
    }

    #[tokio::test]
    async fn read_image_parts_loads_files_with_guessed_mime() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("scene1.jpg");
        let b = dir.path().join("scene2.png");
        std::fs::write(&a, b"fakejpegdata").unwrap();
        std::fs::write(&b, b"fakepngdata").unwrap();

        let parts = read_image_parts(&[a, b]).await.unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].file_name, "scene1.jpg");
        assert_eq!(parts[0].mime_type, "image/jpeg");
        assert_eq!(parts[1].mime_type, "image/png");
        assert_eq!(parts[1].bytes, b"fakepngdata");
    }

    #[test]
    fn test_mime_for_extension() {
        assert_eq!(mime_for_extension(Some("JPG")), "image/jpeg");
        assert_eq!(mime_for_extension(Some("png")), "image/png");
        assert_eq!(mime_for_extension(None), "application/octet-stream");
    }
}
