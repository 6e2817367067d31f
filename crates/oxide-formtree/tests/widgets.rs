//! Tests for rich-text, attachment and remote-select fields.

mod common;
use common::*;

use oxide_formtree::{
    AttachmentKind, Element, ElementType, FormConfig, FormEngine, MemoryRecords, PostSearch,
    SearchResponse, TermSearch, Widgets,
};
use serde_json::json;

struct FakeWidgets;

impl Widgets for FakeWidgets {
    fn can_rich_edit(&self) -> bool {
        true
    }

    fn rich_text_editor(&self, value: &str, editor_id: &str, field_name: &str) -> String {
        format!(r#"<editor id="{editor_id}" for="{field_name}">{value}</editor>"#)
    }

    fn attachment_picker(&self, value: &str, field_name: &str, kind: AttachmentKind) -> String {
        format!(r#"<picker kind="{}" for="{field_name}">{value}</picker>"#, kind.as_str())
    }
}

fn records() -> MemoryRecords {
    MemoryRecords::new()
        .post(5, "Hello World", "post")
        .post(6, "Contact", "page")
        .term(10, "Rust", "category")
}

#[test]
fn test_rich_text_falls_back_to_textarea() {
    let form = Element::new().child("body", Element::of_type(ElementType::RichText));
    let html = render(&form, json!({"body": "<p>Hi</p>"}));

    assert_contains(
        &html,
        r#"<textarea id="form-body" name="body" rows="10" class="form-input">&lt;p&gt;Hi&lt;/p&gt;</textarea>"#,
    );
    assert_contains(&html, "form-type-textarea");
    assert!(!html.contains("form-type-mce"));
    assert_eq!(html.matches("form-input").count(), 1);
}

#[test]
fn test_fallback_rows_are_configurable() {
    let engine = FormEngine::new().with_config(FormConfig::new().textarea_fallback_rows(4));
    let form = Element::new().child("body", Element::of_type(ElementType::RichText));
    assert_contains(&render_with(&engine, &form, json!({})), r#"rows="4""#);

    let explicit = Element::new().child(
        "body",
        Element::of_type(ElementType::RichText).attr("rows", "2"),
    );
    assert_contains(&render_with(&engine, &explicit, json!({})), r#"rows="2""#);
}

#[test]
fn test_rich_text_editor_is_embedded() {
    let engine = FormEngine::new().with_widgets(FakeWidgets);
    let form = Element::new().child("body", Element::of_type(ElementType::RichText));
    let html = render_with(&engine, &form, json!({"body": "Hi"}));

    assert_contains(
        &html,
        r#"<div id="form-mce-body" class="form-input form-mce-area"><editor id="form-mce-body" for="body">Hi</editor></div>"#,
    );
    assert_contains(&html, "form-type-mce");
}

#[test]
fn test_attachment_fields() {
    let engine = FormEngine::new().with_widgets(FakeWidgets);
    let form = Element::new()
        .child("photo", Element::of_type(ElementType::Image))
        .child("file", Element::of_type(ElementType::Attachment));
    let html = render_with(&engine, &form, json!({"photo": 42}));

    assert_contains(
        &html,
        r#"<input id="form-photo" name="photo" type="text" value="42" data-attachment-type="image" class="form-input select-attachment-field select-image-field" /><picker kind="image" for="photo">42</picker>"#,
    );
    assert_contains(&html, r#"data-attachment-type="attachment" class="form-input select-attachment-field""#);
}

#[test]
fn test_attachment_without_widgets_is_a_plain_field() {
    let form = Element::new().child("photo", Element::of_type(ElementType::Image));
    let html = render(&form, json!({"photo": "42"}));
    assert_contains(&html, r#"type="text" value="42""#);
    assert!(!html.contains("<picker"));
}

#[test]
fn test_post_select_resolves_title() {
    let engine = FormEngine::new().with_records(records());
    let form = Element::new().child(
        "related",
        Element::of_type(ElementType::PostSelect)
            .post_type("post")
            .post_type("page"),
    );

    let html = render_with(&engine, &form, json!({"related": "5"}));
    assert_contains(
        &html,
        r#"name="related" type="hidden" value="5" data-post-type="post page" data-title="Hello World" class="form-input form-post-select""#,
    );

    let html = render_with(&engine, &form, json!({"related": "999"}));
    assert!(!html.contains("data-title"));
}

#[test]
fn test_term_select_resolves_name() {
    let engine = FormEngine::new().with_records(records());
    let form = Element::new().child(
        "topic",
        Element::of_type(ElementType::TermSelect).taxonomy("category"),
    );

    let html = render_with(&engine, &form, json!({"topic": 10}));
    assert_contains(&html, r#"type="hidden" value="10" data-taxonomy="category" data-name="Rust""#);
    assert_contains(&html, "form-term-select");
}

#[test]
fn test_search_endpoints() {
    let engine = FormEngine::new().with_records(records());

    let request: PostSearch =
        serde_json::from_value(json!({"term": "hello", "post_type": ["post"]})).unwrap();
    let response = SearchResponse::from_result(engine.search_posts(&request));
    assert_eq!(
        serde_json::to_value(&response).unwrap(),
        json!({"success": true, "data": [{"id": 5, "label": "Hello World", "kind": "post"}]})
    );

    let request: TermSearch = serde_json::from_value(json!({"term": "ru"})).unwrap();
    let response = SearchResponse::from_result(engine.search_terms(&request));
    assert_eq!(serde_json::to_value(&response).unwrap(), json!({"success": false}));
}
