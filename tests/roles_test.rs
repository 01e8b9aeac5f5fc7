use ai_chat_export::{extract, extract_with_options, Options, Role, SelectorProfile};

fn roles(messages: &[ai_chat_export::Message]) -> Vec<Role> {
    messages.iter().map(|m| m.role).collect()
}

#[test]
fn alternation_without_any_hints() {
    let profile = SelectorProfile::from_json(
        r#"{
            "container_selectors": ["main"],
            "block_strategies": [{"kind": "selectors", "selectors": ["section.turn"]}]
        }"#,
    )
    .unwrap();
    let options = Options {
        profile: Some(profile),
        ..Options::for_url("https://chatgpt.com/c/plain")
    };
    let html = r#"<main>
        <section class="turn"><p>What is the capital of France?</p></section>
        <section class="turn"><p>Paris.</p></section>
        <section class="turn"><p>And of Italy?</p></section>
        <section class="turn"><p>Rome.</p></section>
    </main>"#;

    let transcript = extract_with_options(html, &options).unwrap();

    assert_eq!(
        roles(&transcript.messages),
        vec![Role::User, Role::Assistant, Role::User, Role::Assistant]
    );
    assert!(transcript.warnings.is_empty());
}

#[test]
fn screen_reader_headings_decide_roles() {
    let html = r#"<main>
        <article data-testid="conversation-turn-1"><h6 class="sr-only">ChatGPT said:</h6><div class="whitespace-pre-wrap">Welcome back!</div></article>
        <article data-testid="conversation-turn-2"><h5 class="sr-only">You said:</h5><div class="whitespace-pre-wrap">Thanks</div></article>
    </main>"#;

    let transcript = extract(html, Some("https://chatgpt.com/c/1")).unwrap();
    assert_eq!(roles(&transcript.messages), vec![Role::Assistant, Role::User]);
}

#[test]
fn author_attribute_beats_alternation() {
    let html = r#"<main>
        <div data-message-author-role="assistant"><p>Hi, how can I help?</p></div>
        <div data-message-author-role="assistant"><p>Anything at all.</p></div>
        <div data-message-author-role="user"><p>Tell me a joke.</p></div>
    </main>"#;

    let transcript = extract(html, Some("https://chatgpt.com/c/1")).unwrap();
    assert_eq!(
        roles(&transcript.messages),
        vec![Role::Assistant, Role::Assistant, Role::User]
    );
    assert_eq!(transcript.stats.user_count, 1);
    assert_eq!(transcript.stats.assistant_count, 2);
}

#[test]
fn missing_user_side_is_warned_about() {
    let html = r#"<main>
        <div data-message-author-role="assistant"><p>First answer.</p></div>
        <div data-message-author-role="assistant"><p>Second answer.</p></div>
    </main>"#;

    let transcript = extract(html, Some("https://chatgpt.com/c/1")).unwrap();

    assert_eq!(transcript.stats.user_count, 0);
    assert_eq!(transcript.warnings.len(), 1);
    assert!(transcript.warnings[0].contains("incomplete"));
    assert!(transcript.warnings[0].starts_with("No user messages"));
}

#[test]
fn claude_markers_classify_turns() {
    let html = r#"<main>
        <div data-test-render-count="1"><div data-testid="user-message"><p>Explain recursion briefly.</p></div></div>
        <div data-test-render-count="1"><div class="font-claude-message"><p>A function calling itself.</p></div></div>
    </main>"#;

    let transcript = extract(html, Some("https://claude.ai/chat/1")).unwrap();

    assert_eq!(roles(&transcript.messages), vec![Role::User, Role::Assistant]);
    assert_eq!(transcript.version_label, "Claude");
}

#[test]
fn wrapper_styling_does_not_flip_every_turn() {
    let html = r#"<main><div class="text-token-text-primary">
        <div class="grid-cols-1"><p>Count down from three.</p></div>
        <div class="grid-cols-1"><p>Three, two, one.</p></div>
    </div></main>"#;

    let transcript = extract(html, Some("https://claude.ai/chat/3")).unwrap();

    assert_eq!(roles(&transcript.messages), vec![Role::User, Role::Assistant]);
    assert!(transcript.warnings.is_empty());
}

#[test]
fn claude_title_names_the_model() {
    let html = r#"<html><head><title>Recursion - Claude 3 Opus</title></head><body><main>
        <div data-testid="user-message"><p>Hello</p></div>
        <div class="font-claude-message"><p>Hi there.</p></div>
    </main></body></html>"#;

    let transcript = extract(html, Some("https://claude.ai/chat/2")).unwrap();
    assert_eq!(transcript.version_label, "Claude 3");
}
