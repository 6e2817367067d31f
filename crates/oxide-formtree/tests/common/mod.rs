#![allow(dead_code)]

use oxide_formtree::{options, Element, FormEngine, Schema};
use serde_json::{Map, Value};

pub fn values(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("Expected a JSON object, got {other:?}"),
    }
}

pub fn schema(json: Value) -> Element {
    Schema::from_json(&json).unwrap_or_else(|e| panic!("Failed to load schema: {e}\n{json}"))
}

pub fn render(form: &Element, current: Value) -> String {
    render_with(&FormEngine::new(), form, current)
}

pub fn render_with(engine: &FormEngine, form: &Element, current: Value) -> String {
    engine
        .render_form(form, &values(current))
        .unwrap_or_else(|e| panic!("Failed to render: {e}"))
}

pub fn process(form: &Element, input: Value) -> Value {
    process_with(&FormEngine::new(), form, input)
}

pub fn process_with(engine: &FormEngine, form: &Element, input: Value) -> Value {
    let mut out = Map::new();
    engine
        .process_form(form, &mut out, &input)
        .unwrap_or_else(|e| panic!("Failed to process {input}: {e}"));
    Value::Object(out)
}

/// A form exercising every value shape: scalars, a composite, a repeatable
/// group and a multi-select.
pub fn profile_form() -> Element {
    Element::new()
        .id("profile")
        .child("name", Element::text().label("Name"))
        .child("email", Element::input("email"))
        .child(
            "color",
            Element::select(options([("r", "Red"), ("b", "Blue")])),
        )
        .child("agree", Element::checkbox().label("I agree"))
        .child("bio", Element::textarea())
        .child(
            "address",
            Element::composite()
                .child("street", Element::text())
                .child("zip", Element::text()),
        )
        .child(
            "items",
            Element::repeatable(Element::new().child("title", Element::text())),
        )
        .child(
            "tags",
            Element::select(options([("x", "X"), ("y", "Y"), ("z", "Z")])).multi_select(),
        )
}

pub fn assert_contains(html: &str, needle: &str) {
    assert!(html.contains(needle), "Expected {needle:?} in:\n{html}");
}
