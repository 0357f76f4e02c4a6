//! Shared harness for the end-to-end tests: a fake extractor standing in for
//! yt-dlp and a wiremock server standing in for the Telegram Bot API.

#![allow(dead_code)]

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};
use tempfile::TempDir;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path_regex},
};
use yt2tg::{
    app::{self, Status},
    download::{DownloadRequest, Downloaded, Extractor},
    error::{Error, Result},
};

pub const VIDEO_URL: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";

/// What the fake extractor observed during a call.
#[derive(Debug, Clone)]
pub struct Seen {
    pub url: String,
    pub output_dir: PathBuf,
    pub cookies_path: Option<PathBuf>,
    pub cookies_content: Option<String>,
}

/// Extractor that writes a fixed file into the scratch directory, or fails.
#[derive(Debug)]
pub struct FakeExtractor {
    file_name: &'static str,
    fail_with: Option<&'static str>,
    seen: Mutex<Vec<Seen>>,
}

impl FakeExtractor {
    pub fn producing(file_name: &'static str) -> Self {
        Self {
            file_name,
            fail_with: None,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &'static str) -> Self {
        Self {
            file_name: "unused.mp4",
            fail_with: Some(message),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Extractor for FakeExtractor {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn download(&self, request: &DownloadRequest<'_>) -> Result<Downloaded> {
        self.seen.lock().unwrap().push(Seen {
            url: request.url.to_owned(),
            output_dir: request.output_dir.to_path_buf(),
            cookies_path: request.cookies.map(Path::to_path_buf),
            cookies_content: request.cookies.map(|p| fs::read_to_string(p).unwrap()),
        });

        if let Some(message) = self.fail_with {
            return Err(Error::ytdlp_failed(message));
        }

        let path = request.output_dir.join(self.file_name);
        fs::write(&path, b"not really a video")?;
        Ok(Downloaded {
            path,
            title: "Never Gonna Give You Up".into(),
        })
    }
}

/// Isolated working area plus a mocked Bot API.
pub struct Harness {
    pub server: MockServer,
    pub work: TempDir,
    pub env: HashMap<String, String>,
}

impl Harness {
    pub async fn new() -> Self {
        let server = MockServer::start().await;
        let work = TempDir::new().unwrap();
        let env = [
            ("TELEGRAM_BOT_TOKEN", "123456:TEST-TOKEN".to_owned()),
            ("TELEGRAM_CHAT_ID", "123456789".to_owned()),
            ("TELEGRAM_API_URL", server.uri()),
            ("SCRATCH_ROOT", work.path().display().to_string()),
            ("COOKIES_DIR", work.path().display().to_string()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v))
        .collect();

        Self { server, work, env }
    }

    pub fn set_env(&mut self, key: &str, value: &str) {
        self.env.insert(key.to_owned(), value.to_owned());
    }

    pub async fn mock_success(&self, api_method: &str) {
        let response = serde_json::json!({
            "ok": true,
            "result": {
                "message_id": 42,
                "from": {
                    "id": 987654321,
                    "is_bot": true,
                    "first_name": "TestBot",
                    "username": "test_bot"
                },
                "chat": {
                    "id": 123456789,
                    "first_name": "Test",
                    "username": "testuser",
                    "type": "private"
                },
                "date": 1735992000,
                "text": "uploaded"
            }
        });

        Mock::given(method("POST"))
            .and(path_regex(format!("/bot[^/]+/{api_method}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(response))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_rejection(&self, status: u16, description: &str) {
        let response = serde_json::json!({
            "ok": false,
            "error_code": status,
            "description": description,
        });

        Mock::given(method("POST"))
            .and(path_regex("/bot[^/]+/send.*"))
            .respond_with(ResponseTemplate::new(status).set_body_json(response))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_server_failure(&self, status: u16, body: &str) {
        Mock::given(method("POST"))
            .and(path_regex("/bot[^/]+/send.*"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    /// Run the tool with `args` (program name excluded).
    pub async fn run(&self, args: &[&str], extractor: &dyn Extractor) -> (Status, String) {
        let argv = std::iter::once("yt2tg").chain(args.iter().copied());
        let lookup = |key: &str| self.env.get(key).cloned();
        let mut out = Vec::new();
        let status = app::run(argv, &lookup, extractor, &mut out).await;
        (status, String::from_utf8(out).unwrap())
    }

    pub async fn requests(&self) -> Vec<wiremock::Request> {
        self.server.received_requests().await.unwrap_or_default()
    }

    /// Entries left in the working area after a run.
    pub fn leftovers(&self) -> Vec<PathBuf> {
        fs::read_dir(self.work.path())
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect()
    }
}
