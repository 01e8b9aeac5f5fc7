use ai_chat_export::encoding::{decode_html, detect_encoding};
use ai_chat_export::{extract_bytes, Options};

fn chatgpt() -> Options {
    Options::for_url("https://chatgpt.com/c/encoding")
}

#[test]
fn utf8_content_handled_correctly() {
    let html = "<html><head><meta charset=\"utf-8\"></head><body><main>\
        <div data-message-author-role=\"user\"><p>Translate: é, ñ, ü, 中文</p></div>\
        <div data-message-author-role=\"assistant\"><p>Done ✓</p></div>\
        </main></body></html>"
        .as_bytes();

    let transcript = extract_bytes(html, &chatgpt()).expect("extraction failed");

    assert_eq!(transcript.messages[0].content, "Translate: é, ñ, ü, 中文");
    assert_eq!(transcript.messages[1].content, "Done ✓");
}

#[test]
fn iso88591_converted_to_utf8() {
    // é = 0xE9, ñ = 0xF1, ü = 0xFC in ISO-8859-1
    let html = b"<html><head><meta charset=\"ISO-8859-1\"></head><body><main>\
        <div data-message-author-role=\"user\"><p>Caf\xE9 espa\xF1ol</p></div>\
        <div data-message-author-role=\"assistant\"><p>M\xFCnchen</p></div>\
        </main></body></html>";

    let transcript = extract_bytes(html, &chatgpt()).expect("extraction failed");

    assert_eq!(transcript.messages[0].content, "Café español");
    assert_eq!(transcript.messages[1].content, "München");
}

#[test]
fn utf8_bom_wins_over_meta() {
    let mut html = vec![0xEF, 0xBB, 0xBF];
    html.extend_from_slice(
        "<meta charset=\"windows-1252\"><main>\
         <div data-message-author-role=\"user\"><p>naïve</p></div>\
         <div data-message-author-role=\"assistant\"><p>ok</p></div></main>"
            .as_bytes(),
    );

    assert_eq!(detect_encoding(&html), encoding_rs::UTF_8);
    let transcript = extract_bytes(&html, &chatgpt()).expect("extraction failed");
    assert_eq!(transcript.messages[0].content, "naïve");
}

#[test]
fn invalid_bytes_become_replacement_characters() {
    let html = b"<main><div data-message-author-role=\"user\"><p>bad \xFF byte</p></div>\
        <div data-message-author-role=\"assistant\"><p>fine</p></div></main>";

    let decoded = decode_html(html);
    assert!(decoded.had_errors);

    let transcript = extract_bytes(html, &chatgpt()).expect("extraction failed");
    assert_eq!(transcript.messages[0].content, "bad \u{FFFD} byte");
}
