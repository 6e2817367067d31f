//! Tests for the render and process extension points.

mod common;
use common::*;

use std::sync::{Arc, Mutex};

use oxide_formtree::{Asset, Element, ElementType, FormEngine, Hooks};
use serde_json::{json, Value};

fn recorder() -> (Arc<Mutex<Vec<String>>>, Arc<Mutex<Vec<String>>>) {
    let log = Arc::new(Mutex::new(Vec::new()));
    (Arc::clone(&log), log)
}

#[test]
fn test_before_render_form_rewrites_the_form() {
    let hooks = Hooks::new().before_render_form(|form| {
        if form.id.as_deref() == Some("profile") {
            form.class("extra")
        } else {
            form
        }
    });
    let engine = FormEngine::new().with_hooks(hooks);
    let html = render_with(&engine, &profile_form(), json!({}));
    assert!(html.starts_with(r#"<div id="profile" class="form form-profile extra">"#));
}

#[test]
fn test_prepare_element_runs_generic_then_keyed() {
    let (log, sink) = recorder();
    let keyed_sink = Arc::clone(&sink);
    let hooks = Hooks::new()
        .prepare_element(move |el, _| {
            sink.lock().unwrap().push(format!("generic:{}", el.key));
            el
        })
        .prepare_element_key("name", move |el, _| {
            keyed_sink.lock().unwrap().push(format!("keyed:{}", el.key));
            el.label("Full name")
        });
    let engine = FormEngine::new().with_hooks(hooks);

    let form = Element::new()
        .child("name", Element::text())
        .child("email", Element::text());
    let html = render_with(&engine, &form, json!({}));

    assert_contains(&html, r#"<label class="form-label" for="form-name">Full name</label>"#);
    assert_eq!(
        *log.lock().unwrap(),
        ["generic:name", "keyed:name", "generic:email"]
    );
}

#[test]
fn test_prepare_element_sees_the_root_form() {
    let (log, sink) = recorder();
    let hooks = Hooks::new().prepare_element(move |el, root| {
        sink.lock()
            .unwrap()
            .push(root.id.clone().unwrap_or_default());
        el
    });
    let engine = FormEngine::new().with_hooks(hooks);
    let form = Element::new().id("profile").child(
        "address",
        Element::composite().child("street", Element::text()),
    );
    render_with(&engine, &form, json!({"address": {"street": "x"}}));
    let log = log.lock().unwrap();
    assert!(!log.is_empty());
    assert!(log.iter().all(|id| id == "profile"));
}

#[test]
fn test_prepare_element_can_preset_a_value() {
    let hooks = Hooks::new().prepare_element_key("name", |el, _| el.value("from hook"));
    let engine = FormEngine::new().with_hooks(hooks);
    let html = render_with(&engine, &profile_form(), json!({"name": "from values"}));
    assert_contains(&html, r#"value="from hook""#);
    assert!(!html.contains("from values"));
}

#[test]
fn test_element_rendered_sees_built_attributes() {
    let hooks = Hooks::new().element_rendered_key("name", |mut el, _| {
        assert_eq!(el.attrs.get("name"), Some("name"));
        el.attrs.set("data-checked", "yes");
        el
    });
    let engine = FormEngine::new().with_hooks(hooks);
    let html = render_with(&engine, &profile_form(), json!({}));
    assert_contains(&html, r#"name="name" type="text" data-checked="yes""#);
}

#[test]
fn test_assets_are_requested() {
    let (log, sink) = recorder();
    let hooks = Hooks::new().on_enqueue(move |asset| {
        sink.lock().unwrap().push(format!("{asset:?}"));
    });
    let engine = FormEngine::new().with_hooks(hooks);

    let form = Element::new()
        .child("photo", Element::of_type(ElementType::Image))
        .child("name", Element::text());
    render_with(&engine, &form, json!({}));

    let log = log.lock().unwrap();
    assert!(log.contains(&format!("{:?}", Asset::Media)));
    assert!(log.contains(&format!("{:?}", Asset::FormScripts)));
}

#[test]
fn test_empty_form_requests_no_assets() {
    let (log, sink) = recorder();
    let hooks = Hooks::new().on_enqueue(move |asset| {
        sink.lock().unwrap().push(format!("{asset:?}"));
    });
    let engine = FormEngine::new().with_hooks(hooks);
    render_with(&engine, &Element::new(), json!({}));
    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn test_before_process_form_can_rewrite_input() {
    let hooks = Hooks::new().before_process_form(|form, _values, input| {
        if form.id.as_deref() == Some("profile") {
            if let Value::Object(map) = input {
                map.insert("name".to_string(), json!("Injected"));
            }
        }
    });
    let engine = FormEngine::new().with_hooks(hooks);
    let out = process_with(&engine, &profile_form(), json!({}));
    assert_eq!(out["name"], json!("Injected"));
}

#[test]
fn test_element_processed_can_rewrite_values() {
    let hooks = Hooks::new().element_processed(|element, values, _input| {
        if element.key == "name" {
            if let Some(Value::String(name)) = values.get_mut("name") {
                *name = name.to_uppercase();
            }
        }
    });
    let engine = FormEngine::new().with_hooks(hooks);
    let out = process_with(&engine, &profile_form(), json!({"name": "charlie"}));
    assert_eq!(out["name"], json!("CHARLIE"));
}

#[test]
fn test_element_processed_sees_composite_scope() {
    let (log, sink) = recorder();
    let hooks = Hooks::new().element_processed(move |element, values, _input| {
        if element.key == "zip" {
            let keys: Vec<String> = values.keys().cloned().collect();
            sink.lock().unwrap().push(keys.join(","));
        }
    });
    let engine = FormEngine::new().with_hooks(hooks);
    process_with(
        &engine,
        &profile_form(),
        json!({"address": {"street": "Main", "zip": "1"}}),
    );
    assert_eq!(*log.lock().unwrap(), ["street,zip"]);
}
