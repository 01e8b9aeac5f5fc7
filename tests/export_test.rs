use std::cell::RefCell;
use std::fs;

use ai_chat_export::export::{export_at, filename};
use ai_chat_export::{
    export_current, DownloadRequest, DownloadSink, ExportRequest, FileSink, Formats, Options,
    Platform,
};
use chrono::{DateTime, TimeZone, Utc};
use tempfile::TempDir;

const CHAT: &str = r#"<html><head><title>Greeting</title></head><body><main>
    <div data-message-author-role="user"><div class="whitespace-pre-wrap">Say hello</div></div>
    <div data-message-author-role="assistant"><div class="markdown prose"><p>Hello!</p><img src="https://oaiusercontent.com/wave" alt="wave"></div></div>
</main></body></html>"#;

fn both() -> ExportRequest {
    ExportRequest {
        formats: Formats {
            markdown: true,
            html: true,
        },
    }
}

fn at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 58).unwrap()
}

/// Records every request and fails on the configured call.
#[derive(Default)]
struct RecordingSink {
    fail_on: Option<usize>,
    seen: RefCell<Vec<DownloadRequest>>,
}

impl DownloadSink for RecordingSink {
    async fn save(&self, request: DownloadRequest) -> Result<(), String> {
        let call = self.seen.borrow().len();
        self.seen.borrow_mut().push(request);
        if self.fail_on == Some(call) {
            return Err("Save dialog was cancelled".to_string());
        }
        Ok(())
    }
}

#[tokio::test]
async fn writes_both_formats_to_directory() {
    let dir = TempDir::new().unwrap();
    let sink = FileSink::new(dir.path());
    let options = Options::for_url("https://chatgpt.com/c/export");

    let response = export_at(CHAT, &both(), &options, &sink, at()).await;

    assert!(response.success, "{response:?}");
    assert_eq!(response.message_count, Some(2));
    assert_eq!(response.image_count, Some(1));

    let md_path = dir.path().join("ai-chat-conversation-2024-02-29_23-59-58.md");
    let html_path = dir.path().join("ai-chat-conversation-2024-02-29_23-59-58.html");

    let markdown = fs::read_to_string(md_path).unwrap();
    assert!(markdown.starts_with("# AI Chat Conversation\n\nExported on: 2024-02-29 23:59:58 UTC\n\n"));
    assert!(markdown.contains("## User\n\nSay hello\n\n## ChatGPT\n\nHello!\n\n![wave (ID: wave)]"));

    let html = fs::read_to_string(html_path).unwrap();
    assert!(html.contains("<img src=\"https://oaiusercontent.com/wave\""));
}

#[tokio::test]
async fn existing_file_is_not_replaced() {
    let dir = TempDir::new().unwrap();
    let name = filename(Platform::ChatGpt, "md", at());
    fs::write(dir.path().join(&name), "keep me").unwrap();

    let request = ExportRequest {
        formats: Formats {
            markdown: true,
            html: false,
        },
    };
    let options = Options::for_url("https://chatgpt.com/c/export");

    let response = export_at(CHAT, &request, &options, &FileSink::new(dir.path()), at()).await;
    assert!(!response.success);
    assert!(response.error.unwrap().ends_with("already exists"));
    assert_eq!(fs::read_to_string(dir.path().join(&name)).unwrap(), "keep me");

    let forced = FileSink::new(dir.path()).overwrite(true);
    let response = export_at(CHAT, &request, &options, &forced, at()).await;
    assert!(response.success);
    assert!(fs::read_to_string(dir.path().join(&name)).unwrap().contains("Say hello"));
}

#[tokio::test]
async fn missing_output_directory_reports_path() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope");
    let options = Options::for_url("https://chatgpt.com/c/export");

    let response = export_at(CHAT, &both(), &options, &FileSink::new(&missing), at()).await;

    assert!(!response.success);
    let error = response.error.unwrap();
    assert!(error.starts_with("cannot access "), "{error}");
    assert!(error.contains("nope"), "{error}");
}

#[tokio::test]
async fn downloads_run_in_order_with_prompt() {
    let sink = RecordingSink::default();
    let options = Options::for_url("https://claude.ai/chat/export");
    let page = r#"<main>
        <div data-testid="user-message"><p>Hi</p></div>
        <div class="font-claude-message"><p>Hello, I am Claude Sonnet.</p></div>
    </main>"#;

    let response = export_at(page, &both(), &options, &sink, at()).await;
    assert!(response.success);

    let seen = sink.seen.borrow();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].suggested_filename, "claude-conversation-2024-02-29_23-59-58.md");
    assert_eq!(seen[0].content_type, "text/markdown");
    assert_eq!(seen[1].suggested_filename, "claude-conversation-2024-02-29_23-59-58.html");
    assert_eq!(seen[1].content_type, "text/html");
    assert!(seen.iter().all(|r| r.prompt_user_for_location));
}

#[tokio::test]
async fn first_failed_download_stops_the_chain() {
    let sink = RecordingSink {
        fail_on: Some(0),
        ..RecordingSink::default()
    };
    let options = Options::for_url("https://chatgpt.com/c/export");

    let response = export_at(CHAT, &both(), &options, &sink, at()).await;

    assert!(!response.success);
    assert_eq!(response.error.as_deref(), Some("Save dialog was cancelled"));
    assert_eq!(response.message_count, None);
    assert_eq!(sink.seen.borrow().len(), 1);
}

#[tokio::test]
async fn extraction_failure_is_reported() {
    let sink = RecordingSink::default();
    let options = Options::for_url("https://example.com/not-a-chat");

    let response = export_current("<p>recipe</p>", &both(), &options, &sink).await;

    assert!(!response.success);
    assert_eq!(
        response.error.as_deref(),
        Some("Not a supported AI chat page: https://example.com/not-a-chat")
    );
    assert!(sink.seen.borrow().is_empty());
}

#[tokio::test]
async fn no_formats_still_succeeds() {
    let sink = RecordingSink::default();
    let options = Options::for_url("https://chatgpt.com/c/export");

    let response = export_current(CHAT, &ExportRequest::default(), &options, &sink).await;

    assert!(response.success);
    assert_eq!(response.message_count, Some(2));
    assert!(sink.seen.borrow().is_empty());
}

#[tokio::test]
async fn response_serializes_for_callers() {
    let sink = RecordingSink::default();
    let options = Options::for_url("https://chatgpt.com/c/export");

    let response = export_at(CHAT, &both(), &options, &sink, at()).await;
    assert_eq!(
        serde_json::to_string(&response).unwrap(),
        r#"{"success":true,"messageCount":2,"imageCount":1}"#
    );
}
