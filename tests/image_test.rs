use ai_chat_export::{extract, Transcript};

fn chatgpt_page(assistant_body: &str) -> String {
    format!(
        r#"<html><body><main>
            <div data-message-author-role="user"><div class="whitespace-pre-wrap">Make me a picture</div></div>
            <div data-message-author-role="assistant">{assistant_body}</div>
        </main></body></html>"#
    )
}

fn extract_chatgpt(html: &str) -> Transcript {
    match extract(html, Some("https://chatgpt.com/c/images")) {
        Ok(transcript) => transcript,
        Err(err) => panic!("expected Ok(_), got Err({err:?})"),
    }
}

#[test]
fn same_source_is_emitted_once() {
    let html = chatgpt_page(
        r#"<div class="markdown prose">
             <p>Here it is</p>
             <p><img src="https://oaiusercontent.com/abc-uuid" alt="first"></p>
             <p><img src="https://oaiusercontent.com/abc-uuid" alt="second"></p>
           </div>"#,
    );

    let transcript = extract_chatgpt(&html);
    let content = &transcript.messages[1].content;

    assert_eq!(transcript.stats.image_count, 1);
    assert_eq!(content.matches("https://oaiusercontent.com/abc-uuid").count(), 2);
    assert_eq!(content.matches("![").count(), 1);
    assert!(content.contains("![first (ID: abc-uuid)]"));
}

#[test]
fn foreign_host_is_skipped() {
    let html = chatgpt_page(
        r#"<div class="markdown prose">
             <p>Icons <img src="https://example.com/icon.png" alt="icon"> and a render
             <img src="https://oaiusercontent.com/u1" alt="render"></p>
           </div>"#,
    );

    let transcript = extract_chatgpt(&html);
    let content = &transcript.messages[1].content;

    assert!(!content.contains("example.com"));
    assert!(content.contains("![render (ID: u1)](https://oaiusercontent.com/u1)"));
    assert!(content.contains("<!-- Image URI: https://oaiusercontent.com/u1 | Image ID: u1 -->"));
    assert_eq!(transcript.stats.image_count, 1);
}

#[test]
fn data_uri_is_skipped() {
    let html = chatgpt_page(
        r#"<div class="markdown prose"><p>Inline pixel <img src="data:image/png;base64,iVBORw0KGgo=" alt="px"></p></div>"#,
    );

    let transcript = extract_chatgpt(&html);
    assert_eq!(transcript.messages[1].content, "Inline pixel");
    assert_eq!(transcript.stats.image_count, 0);
}

#[test]
fn missing_alt_uses_profile_default() {
    let html = chatgpt_page(
        r#"<div class="markdown prose"><p>Done</p><img src="https://files.oaiusercontent.com/files/file-XyZ/raw?se=1"></div>"#,
    );

    let transcript = extract_chatgpt(&html);
    assert!(transcript.messages[1]
        .content
        .contains("![Generated image (ID: file-XyZ)]"));
    assert_eq!(transcript.images[0].alt, "Generated image");
}

#[test]
fn uuid_wins_over_files_segment() {
    let src = "https://files.oaiusercontent.com/files/file-AbC/raw?id=1b2c3d4e-aaaa-4bbb-8ccc-0123456789ab";
    let html = chatgpt_page(&format!(
        r#"<div class="markdown prose"><p>Result</p><img src="{src}" alt="chart"></div>"#
    ));

    let transcript = extract_chatgpt(&html);
    assert_eq!(transcript.images[0].id, "1b2c3d4e-aaaa-4bbb-8ccc-0123456789ab");
    assert_eq!(transcript.images[0].source_url, src);
}

#[test]
fn layered_container_emits_visible_layer() {
    let html = chatgpt_page(
        r#"<div class="group/imagegen-image">
             <div class="absolute" style="filter: blur(24px)"><img src="https://oaiusercontent.com/preview" alt="preview"></div>
             <div class="z-2"><img src="https://oaiusercontent.com/final" alt="final"></div>
           </div>
           <div class="markdown prose"><p>Your image is ready.</p></div>"#,
    );

    let transcript = extract_chatgpt(&html);
    let content = &transcript.messages[1].content;

    assert!(content.starts_with("Your image is ready."));
    assert!(content.contains("(https://oaiusercontent.com/final)"));
    assert!(!content.contains("preview"));
    assert_eq!(transcript.stats.image_count, 1);
}

#[test]
fn image_seen_in_earlier_message_is_not_repeated() {
    let html = r#"<html><body><main>
        <div data-message-author-role="user"><div class="whitespace-pre-wrap">Edit this <img src="https://oaiusercontent.com/shared" alt="upload"></div></div>
        <div data-message-author-role="assistant"><div class="markdown prose"><p>Edited</p><img src="https://oaiusercontent.com/shared" alt="again"></div></div>
    </main></body></html>"#;

    let transcript = extract_chatgpt(html);

    assert!(transcript.messages[0].content.contains("![upload"));
    assert_eq!(transcript.messages[1].content, "Edited");
    assert_eq!(transcript.images.len(), 1);
}
