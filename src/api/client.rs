//! Backend REST API Client
//!
//! HTTP client for the job-application backend. Carries the session and
//! CSRF cookies on every request, retries transient failures, and decodes
//! every response body into typed records at this boundary.

use async_trait::async_trait;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use super::backend::Backend;
use super::dto::*;
use super::error::{extract_message, ApiError, ApiResult};
use crate::models::{
    AnswerAnalysis, Application, ApplicationStatus, EmailDraft, InterviewStart, Job, JobId,
    MatchAnalysis, NewJob, NewResume, Resume, ResumeFile, ResumeId, SessionId, TrackingId,
    Transcript,
};

/// Cookie the backend uses for its CSRF token
pub const CSRF_COOKIE: &str = "csrftoken";

/// Header the backend expects the CSRF token in
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// Wait requested by a 429's `Retry-After` seconds, capped at `cap`
fn retry_after(headers: &HeaderMap, cap: Duration) -> Option<Duration> {
    let secs = headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()?;
    Some(Duration::from_secs(secs).min(cap))
}

/// Configuration for the API client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend origin (e.g., "http://localhost:8000"); `/api/` is appended
    pub base_url: String,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
    /// Maximum attempts per request, including the first
    pub max_retries: u32,
    /// Base delay for quadratic backoff between attempts
    pub retry_base_delay_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            request_timeout_ms: 30_000,
            max_retries: 3,
            retry_base_delay_ms: 250,
        }
    }
}

/// Backend REST API client
pub struct ApiClient {
    client: Client,
    jar: Arc<Jar>,
    origin: Url,
    config: ClientConfig,
}

/// Request body, kept rebuildable so retries can resend it
enum Payload {
    Empty,
    Json(serde_json::Value),
    Multipart {
        fields: Vec<(&'static str, String)>,
        files: Vec<(&'static str, String, Vec<u8>)>,
    },
}

impl Payload {
    fn json<T: Serialize + ?Sized>(body: &T) -> ApiResult<Self> {
        serde_json::to_value(body)
            .map(Payload::Json)
            .map_err(|e| ApiError::Malformed(format!("failed to encode request: {}", e)))
    }

    fn to_form(
        fields: &[(&'static str, String)],
        files: &[(&'static str, String, Vec<u8>)],
    ) -> Form {
        let mut form = Form::new();
        for (name, value) in fields {
            form = form.text(*name, value.clone());
        }
        for (name, file_name, data) in files {
            form = form.part(*name, Part::bytes(data.clone()).file_name(file_name.clone()));
        }
        form
    }
}

impl ApiClient {
    /// Create a new API client with the given configuration
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        let origin = Url::parse(config.base_url.trim_end_matches('/'))
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;

        let jar = Arc::new(Jar::default());
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .cookie_provider(Arc::clone(&jar))
            .build()?;

        Ok(Self {
            client,
            jar,
            origin,
            config,
        })
    }

    /// Get the current configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn url(&self, path: &str) -> ApiResult<Url> {
        let full = format!(
            "{}/api/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&full).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", full, e)))
    }

    /// Current CSRF token from the cookie jar, if the backend has set one
    pub fn csrf_token(&self) -> Option<String> {
        let header = self.jar.cookies(&self.origin)?;
        let raw = header.to_str().ok()?;
        raw.split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == CSRF_COOKIE)
            .map(|(_, value)| value.to_string())
    }

    fn build(&self, method: &Method, url: &Url, payload: &Payload) -> reqwest::RequestBuilder {
        let mut builder = self.client.request(method.clone(), url.clone());

        if *method != Method::GET {
            if let Some(token) = self.csrf_token() {
                builder = builder.header(CSRF_HEADER, token);
            }
        }

        match payload {
            Payload::Empty => builder,
            Payload::Json(value) => builder.json(value),
            Payload::Multipart { fields, files } => {
                builder.multipart(Payload::to_form(fields, files))
            }
        }
    }

    /// Send a request with retry logic, returning the raw response body
    ///
    /// Connect failures are retried for every method. Timeouts and gateway
    /// errors are retried only for idempotent methods so a POST that may
    /// have reached the server is never duplicated.
    async fn execute(&self, method: Method, path: &str, payload: Payload) -> ApiResult<String> {
        let url = self.url(path)?;
        let idempotent = matches!(method, Method::GET | Method::PATCH | Method::DELETE);
        let attempts = self.config.max_retries.max(1);
        let mut last_error = ApiError::Unavailable;

        for attempt in 0..attempts {
            if attempt > 0 {
                // Quadratic backoff: base, 4x base, 9x base...
                let factor = (attempt as u64).pow(2);
                let delay = Duration::from_millis(self.config.retry_base_delay_ms * factor);
                tokio::time::sleep(delay).await;
                tracing::debug!(%method, path, attempt, "Retrying backend request");
            }

            match self.build(&method, &url, &payload).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return response.text().await.map_err(ApiError::from_transport);
                    }

                    if status == StatusCode::TOO_MANY_REQUESTS {
                        last_error = ApiError::RateLimited;
                        if attempt + 1 < attempts {
                            let cap = Duration::from_millis(self.config.request_timeout_ms);
                            if let Some(delay) = retry_after(response.headers(), cap) {
                                tokio::time::sleep(delay).await;
                            }
                        }
                        continue;
                    }

                    let text = response.text().await.unwrap_or_default();
                    let error = ApiError::Backend {
                        status: status.as_u16(),
                        message: extract_message(&text, status.as_u16()),
                    };
                    if idempotent && error.is_transient() {
                        last_error = error;
                        continue;
                    }
                    return Err(error);
                }
                Err(e) => {
                    let error = ApiError::from_transport(e);
                    let retry = match error {
                        ApiError::Unavailable => true,
                        ApiError::Timeout => idempotent,
                        _ => false,
                    };
                    if !retry {
                        return Err(error);
                    }
                    last_error = error;
                }
            }
        }

        tracing::warn!(%method, path, error = %last_error, "Backend request failed after retries");
        Err(last_error)
    }

    fn decode<T: DeserializeOwned>(path: &str, body: &str) -> ApiResult<T> {
        serde_json::from_str(body)
            .map_err(|e| ApiError::Malformed(format!("{}: {}", path, e)))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let body = self.execute(Method::GET, path, Payload::Empty).await?;
        Self::decode(path, &body)
    }

    async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = self.execute(method, path, Payload::json(body)?).await?;
        Self::decode(path, &body)
    }

    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let body = self.execute(Method::POST, path, Payload::Empty).await?;
        Self::decode(path, &body)
    }

    async fn load_file(file: &ResumeFile) -> ApiResult<(String, Vec<u8>)> {
        match file {
            ResumeFile::Path(path) => {
                let data = tokio::fs::read(path).await?;
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| "upload".to_string());
                Ok((name, data))
            }
            ResumeFile::Bytes { file_name, data } => Ok((file_name.clone(), data.clone())),
        }
    }

    /// Ask the backend to set its CSRF cookie
    pub async fn prime_csrf(&self) -> ApiResult<()> {
        self.execute(Method::GET, "csrf/", Payload::Empty).await?;
        Ok(())
    }
}

#[async_trait]
impl Backend for ApiClient {
    async fn list_jobs(&self) -> ApiResult<Vec<Job>> {
        self.get_json("jobs/").await
    }

    async fn create_job(&self, job: &NewJob) -> ApiResult<Job> {
        self.send_json(Method::POST, "jobs/", job).await
    }

    async fn delete_job(&self, id: JobId) -> ApiResult<()> {
        self.execute(Method::DELETE, &format!("jobs/{}/", id), Payload::Empty)
            .await?;
        Ok(())
    }

    async fn search_jobs(&self, keywords: &str) -> ApiResult<String> {
        let response: MessageResponse = self
            .send_json(Method::POST, "jobs/search/", &SearchRequest { keywords })
            .await?;
        Ok(response.message)
    }

    async fn apply_all(&self, request: &ApplyAllRequest) -> ApiResult<String> {
        let response: MessageResponse = self
            .send_json(Method::POST, "jobs/apply_all/", request)
            .await?;
        Ok(response.message)
    }

    async fn list_resumes(&self) -> ApiResult<Vec<Resume>> {
        self.get_json("resumes/").await
    }

    async fn create_resume(&self, resume: &NewResume) -> ApiResult<Resume> {
        let fields = vec![
            ("name", resume.name.clone()),
            ("description", resume.description.clone()),
            ("latex_code", resume.latex_code.clone()),
        ];
        let mut files = Vec::new();
        if let Some(file) = &resume.file {
            let (file_name, data) = Self::load_file(file).await?;
            files.push(("file", file_name, data));
        }

        let body = self
            .execute(Method::POST, "resumes/", Payload::Multipart { fields, files })
            .await?;
        Self::decode("resumes/", &body)
    }

    async fn list_applications(&self) -> ApiResult<Vec<Application>> {
        self.get_json("applications/").await
    }

    async fn create_application(&self, job_id: JobId, resume_id: ResumeId) -> ApiResult<TrackingId> {
        let created: CreatedApplication = self
            .send_json(
                Method::POST,
                "applications/",
                &CreateApplicationRequest { job_id, resume_id },
            )
            .await?;
        Ok(created.tracking_id)
    }

    async fn update_status(&self, id: TrackingId, status: ApplicationStatus) -> ApiResult<Application> {
        self.send_json(
            Method::PATCH,
            &format!("applications/{}/", id),
            &StatusUpdate { status },
        )
        .await
    }

    async fn generate_code(&self, id: TrackingId, prompt: &str) -> ApiResult<String> {
        let generated: GeneratedCode = self
            .send_json(
                Method::POST,
                &format!("applications/{}/generate_code/", id),
                &GenerateCodeRequest { prompt },
            )
            .await?;
        Ok(generated.code)
    }

    async fn generate_pdf(&self, id: TrackingId, latex_code: &str) -> ApiResult<String> {
        let rendered: RenderedDocument = self
            .send_json(
                Method::POST,
                &format!("applications/{}/generate_pdf/", id),
                &RenderRequest { latex_code },
            )
            .await?;
        Ok(rendered.pdf_url)
    }

    async fn generate_email_draft(&self, id: TrackingId) -> ApiResult<EmailDraft> {
        self.post_empty(&format!("applications/{}/generate_email_draft/", id))
            .await
    }

    async fn send_email(&self, id: TrackingId, draft: &EmailDraft) -> ApiResult<()> {
        let body = SendEmailRequest {
            email_body: &draft.email_body,
            hr_email: &draft.hr_email,
        };
        self.execute(
            Method::POST,
            &format!("applications/{}/send_email/", id),
            Payload::json(&body)?,
        )
        .await?;
        Ok(())
    }

    async fn analyze_match(&self, id: TrackingId) -> ApiResult<MatchAnalysis> {
        self.post_empty(&format!("applications/{}/analyze_match/", id))
            .await
    }

    async fn upload_final(&self, id: TrackingId, file: &ResumeFile) -> ApiResult<()> {
        let (file_name, data) = Self::load_file(file).await?;
        let payload = Payload::Multipart {
            fields: Vec::new(),
            files: vec![("final_resume", file_name, data)],
        };
        self.execute(
            Method::POST,
            &format!("applications/{}/upload_final/", id),
            payload,
        )
        .await?;
        Ok(())
    }

    async fn start_interview(&self, job_id: JobId) -> ApiResult<InterviewStart> {
        self.post_empty(&format!("interview/{}/start/", job_id)).await
    }

    async fn interview_chat(&self, session_id: SessionId, message: &str) -> ApiResult<Transcript> {
        let response: ChatResponse = self
            .send_json(
                Method::POST,
                &format!("interview/{}/chat/", session_id),
                &ChatRequest { message },
            )
            .await?;
        Ok(response.messages)
    }

    async fn analyze_answer(
        &self,
        session_id: SessionId,
        question: &str,
        answer: &str,
    ) -> ApiResult<AnswerAnalysis> {
        self.send_json(
            Method::POST,
            &format!("interview/{}/analyze_answer/", session_id),
            &AnalyzeAnswerRequest { question, answer },
        )
        .await
    }

    async fn login(&self, username: &str, password: &str) -> ApiResult<String> {
        self.prime_csrf().await?;
        let response: MessageResponse = self
            .send_json(Method::POST, "login/", &LoginRequest { username, password })
            .await?;
        tracing::info!(username, "Logged in to backend");
        Ok(response.message)
    }

    async fn logout(&self) -> ApiResult<()> {
        self.execute(Method::POST, "logout/", Payload::Empty).await?;
        Ok(())
    }

    async fn debug_log(&self, msg: &str, context: &str) -> ApiResult<()> {
        self.execute(
            Method::POST,
            "debug_log/",
            Payload::json(&DebugLogRequest { msg, context })?,
        )
        .await?;
        Ok(())
    }

    fn resolve_media_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!(
                "{}/{}",
                self.config.base_url.trim_end_matches('/'),
                path.trim_start_matches('/')
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Path;
    use axum::http::{HeaderMap, StatusCode as AxumStatus};
    use axum::routing::{get, patch, post};
    use axum::{Json, Router};
    use std::sync::atomic::{AtomicUsize, Ordering};

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn client_for(base_url: String) -> ApiClient {
        ApiClient::new(ClientConfig {
            base_url,
            request_timeout_ms: 2_000,
            max_retries: 3,
            retry_base_delay_ms: 1,
        })
        .unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.max_retries, 3);
    }

    #[test]
    fn test_url_building() {
        let client = client_for("http://localhost:8000/".to_string());
        let url = client.url("jobs/7/").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/jobs/7/");
    }

    #[test]
    fn test_invalid_base_url() {
        let result = ApiClient::new(ClientConfig {
            base_url: "not a url".to_string(),
            ..ClientConfig::default()
        });
        assert!(matches!(result, Err(ApiError::InvalidUrl(_))));
    }

    #[test]
    fn test_resolve_media_url() {
        let client = client_for("http://127.0.0.1:8000".to_string());
        assert_eq!(
            client.resolve_media_url("/media/final_resumes/a.pdf"),
            "http://127.0.0.1:8000/media/final_resumes/a.pdf"
        );
        assert_eq!(
            client.resolve_media_url("https://cdn.example.com/a.pdf"),
            "https://cdn.example.com/a.pdf"
        );
    }

    #[tokio::test]
    async fn test_list_jobs_decodes_array() {
        let router = Router::new().route(
            "/api/jobs/",
            get(|| async {
                Json(serde_json::json!([
                    {"id": 1, "title": "SWE", "company": "Acme", "link": "https://x", "source": "LinkedIn"},
                    {"id": 2, "title": "SRE", "company": "Initech"}
                ]))
            }),
        );
        let client = client_for(serve(router).await);

        let jobs = client.list_jobs().await.unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].source, "LinkedIn");
        assert_eq!(jobs[1].company, "Initech");
    }

    #[tokio::test]
    async fn test_backend_error_message_is_extracted() {
        let router = Router::new().route(
            "/api/jobs/search/",
            post(|| async {
                (
                    AxumStatus::BAD_REQUEST,
                    Json(serde_json::json!({"error": "Keywords required"})),
                )
            }),
        );
        let client = client_for(serve(router).await);

        let err = client.search_jobs("").await.unwrap_err();
        match err {
            ApiError::Backend { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Keywords required");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_classified() {
        let router = Router::new().route("/api/resumes/", get(|| async { "{not json" }));
        let client = client_for(serve(router).await);

        let err = client.list_resumes().await.unwrap_err();
        assert!(matches!(err, ApiError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_chat_transcript_string_and_array_agree() {
        let router = Router::new()
            .route(
                "/api/interview/:id/chat/",
                post(|Path(id): Path<i64>| async move {
                    let turns = serde_json::json!([
                        {"role": "ai", "content": "Why us?"},
                        {"role": "user", "content": "Great team"}
                    ]);
                    if id == 1 {
                        Json(serde_json::json!({"messages": turns}))
                    } else {
                        Json(serde_json::json!({"messages": turns.to_string()}))
                    }
                }),
            );
        let client = client_for(serve(router).await);

        let native = client.interview_chat(1, "Great team").await.unwrap();
        let encoded = client.interview_chat(2, "Great team").await.unwrap();
        assert_eq!(native, encoded);
        assert_eq!(native.len(), 2);
    }

    #[tokio::test]
    async fn test_get_retries_transient_failures() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let router = Router::new().route(
            "/api/applications/",
            get(move || {
                let counter = Arc::clone(&counter);
                async move {
                    let n = counter.fetch_add(1, Ordering::SeqCst);
                    if n < 2 {
                        (AxumStatus::SERVICE_UNAVAILABLE, "busy".to_string())
                    } else {
                        (AxumStatus::OK, r#"[{"tracking_id": 4, "status": "sent"}]"#.to_string())
                    }
                }
            }),
        );
        let client = client_for(serve(router).await);

        let apps = client.list_applications().await.unwrap();
        assert_eq!(apps.len(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_retry_after_is_capped() {
        let mut headers = reqwest::header::HeaderMap::new();
        let cap = Duration::from_secs(2);
        assert_eq!(retry_after(&headers, cap), None);

        headers.insert(RETRY_AFTER, "1".parse().unwrap());
        assert_eq!(retry_after(&headers, cap), Some(Duration::from_secs(1)));

        headers.insert(RETRY_AFTER, "3600".parse().unwrap());
        assert_eq!(retry_after(&headers, cap), Some(cap));

        headers.insert(RETRY_AFTER, "Wed, 21 Oct 2026 07:28:00 GMT".parse().unwrap());
        assert_eq!(retry_after(&headers, cap), None);
    }

    #[tokio::test]
    async fn test_rate_limit_wait_is_bounded() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let router = Router::new().route(
            "/api/jobs/",
            get(move || {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    (
                        AxumStatus::TOO_MANY_REQUESTS,
                        [(axum::http::header::RETRY_AFTER, "3600")],
                        "slow down",
                    )
                }
            }),
        );
        let client = ApiClient::new(ClientConfig {
            base_url: serve(router).await,
            request_timeout_ms: 200,
            max_retries: 2,
            retry_base_delay_ms: 1,
        })
        .unwrap();

        let started = std::time::Instant::now();
        let err = client.list_jobs().await.unwrap_err();
        assert!(matches!(err, ApiError::RateLimited));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        // One capped wait between the attempts, none after the last
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_post_is_not_retried_on_gateway_error() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let router = Router::new().route(
            "/api/jobs/apply_all/",
            post(move || {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    (AxumStatus::BAD_GATEWAY, "upstream down")
                }
            }),
        );
        let client = client_for(serve(router).await);

        let err = client.apply_all(&ApplyAllRequest::default()).await.unwrap_err();
        assert!(matches!(err, ApiError::Backend { status: 502, .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_status_patch_body() {
        let router = Router::new().route(
            "/api/applications/:id/",
            patch(|Path(id): Path<i64>, Json(body): Json<serde_json::Value>| async move {
                Json(serde_json::json!({"tracking_id": id, "status": body["status"]}))
            }),
        );
        let client = client_for(serve(router).await);

        let app = client
            .update_status(11, ApplicationStatus::Interview)
            .await
            .unwrap();
        assert_eq!(app.tracking_id, 11);
        assert_eq!(app.status, ApplicationStatus::Interview);
    }

    #[tokio::test]
    async fn test_csrf_cookie_is_echoed_as_header() {
        let router = Router::new()
            .route(
                "/api/csrf/",
                get(|| async {
                    (
                        [("set-cookie", "csrftoken=tok123; Path=/")],
                        Json(serde_json::json!({"message": "CSRF Cookie Set"})),
                    )
                }),
            )
            .route(
                "/api/login/",
                post(|headers: HeaderMap| async move {
                    let token = headers
                        .get("x-csrftoken")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("missing")
                        .to_string();
                    Json(serde_json::json!({"message": token}))
                }),
            );
        let client = client_for(serve(router).await);

        let echoed = client.login("alice", "secret").await.unwrap();
        assert_eq!(echoed, "tok123");
        assert_eq!(client.csrf_token().as_deref(), Some("tok123"));
    }

    #[tokio::test]
    async fn test_resume_upload_is_multipart() {
        let router = Router::new().route(
            "/api/resumes/",
            post(|headers: HeaderMap| async move {
                let content_type = headers
                    .get("content-type")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("")
                    .to_string();
                let is_multipart = content_type.starts_with("multipart/form-data");
                Json(serde_json::json!({
                    "id": 5,
                    "name": if is_multipart { "multipart" } else { "other" }
                }))
            }),
        );
        let client = client_for(serve(router).await);

        let resume = client
            .create_resume(&NewResume {
                name: "Base".into(),
                description: String::new(),
                latex_code: "\\section{Experience}".into(),
                file: Some(ResumeFile::Bytes {
                    file_name: "cv.pdf".into(),
                    data: vec![1, 2, 3],
                }),
            })
            .await
            .unwrap();
        assert_eq!(resume.id, 5);
        assert_eq!(resume.name, "multipart");
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_unavailable() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = ApiClient::new(ClientConfig {
            base_url: format!("http://{}", addr),
            request_timeout_ms: 1_000,
            max_retries: 2,
            retry_base_delay_ms: 1,
        })
        .unwrap();

        let err = client.list_jobs().await.unwrap_err();
        assert!(matches!(err, ApiError::Unavailable));
        assert!(err.is_transient());
    }
}
