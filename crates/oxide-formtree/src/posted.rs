//! Posted form bodies.
//!
//! Browsers post flat `name=value` pairs; the bracketed names produced by the
//! renderer (`address[street]`, `items[0][a]`, `tags[]`) describe where each
//! value lives in the input tree. Objects whose keys are all non-negative
//! integers become sequences ordered by index.

use serde_json::{Map, Value};

use crate::element::scalar_string;

/// One step of a bracketed name.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Key(String),
    /// `[]`: append to a sequence.
    Push,
}

/// Parses an `application/x-www-form-urlencoded` body into an input tree.
pub fn parse_urlencoded(body: &str) -> Value {
    let pairs = body
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let mut parts = pair.splitn(2, '=');
            let name = parts.next().unwrap_or_default();
            let value = parts.next().unwrap_or_default();
            (urlencoding_decode(name), urlencoding_decode(value))
        });
    from_pairs(pairs)
}

/// Builds an input tree from decoded `(name, value)` pairs.
pub fn from_pairs<I, K, V>(pairs: I) -> Value
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    let mut root = Value::Object(Map::new());
    for (name, value) in pairs {
        let segments = parse_name(name.as_ref());
        insert(&mut root, &segments, value.into());
    }
    into_sequences(&mut root);
    root
}

/// Flattens a values tree into the `(name, value)` pairs a browser would post.
///
/// `false` and `null` are omitted, as an unchecked checkbox is.
pub fn flatten_values(values: &Map<String, Value>) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for (key, value) in values {
        flatten_into(key, value, &mut pairs);
    }
    pairs
}

fn flatten_into(name: &str, value: &Value, pairs: &mut Vec<(String, String)>) {
    match value {
        Value::Null | Value::Bool(false) => {}
        Value::Array(items) if items.iter().all(|item| !item.is_object() && !item.is_array()) => {
            let name = format!("{name}[]");
            for item in items {
                if let Some(item) = scalar_string(item) {
                    pairs.push((name.clone(), item));
                }
            }
        }
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                flatten_into(&format!("{name}[{index}]"), item, pairs);
            }
        }
        Value::Object(map) => {
            for (key, item) in map {
                flatten_into(&format!("{name}[{key}]"), item, pairs);
            }
        }
        scalar => {
            if let Some(text) = scalar_string(scalar) {
                pairs.push((name.to_string(), text));
            }
        }
    }
}

/// Removes one level of backslash escaping from every string in the tree.
pub fn unslash(value: &mut Value) {
    match value {
        Value::String(s) => *s = strip_slashes(s),
        Value::Array(items) => items.iter_mut().for_each(unslash),
        Value::Object(map) => map.values_mut().for_each(unslash),
        _ => {}
    }
}

fn strip_slashes(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn parse_name(name: &str) -> Vec<Segment> {
    let (base, mut rest) = match name.find('[') {
        Some(open) if open > 0 => (&name[..open], &name[open..]),
        _ => return vec![Segment::Key(name.to_string())],
    };

    let mut segments = vec![Segment::Key(base.to_string())];
    while let Some(inner) = rest.strip_prefix('[') {
        let Some(close) = inner.find(']') else {
            break;
        };
        let key = &inner[..close];
        segments.push(if key.is_empty() {
            Segment::Push
        } else {
            Segment::Key(key.to_string())
        });
        rest = &inner[close + 1..];
    }
    segments
}

fn insert(target: &mut Value, segments: &[Segment], value: String) {
    let Some((first, rest)) = segments.split_first() else {
        *target = Value::String(value);
        return;
    };

    match first {
        Segment::Key(key) => {
            if !target.is_object() {
                *target = Value::Object(Map::new());
            }
            if let Value::Object(map) = target {
                let slot = map.entry(key.clone()).or_insert(Value::Null);
                insert(slot, rest, value);
            }
        }
        Segment::Push => {
            if !target.is_array() {
                *target = Value::Array(Vec::new());
            }
            if let Value::Array(items) = target {
                items.push(Value::Null);
                if let Some(last) = items.last_mut() {
                    insert(last, rest, value);
                }
            }
        }
    }
}

/// Turns objects keyed only by integers into sequences ordered by index.
fn into_sequences(value: &mut Value) {
    match value {
        Value::Array(items) => items.iter_mut().for_each(into_sequences),
        Value::Object(map) => {
            map.values_mut().for_each(into_sequences);

            if map.is_empty() {
                return;
            }
            let indices: Option<Vec<usize>> = map.keys().map(|k| k.parse().ok()).collect();
            if let Some(indices) = indices {
                let mut entries: Vec<(usize, Value)> = indices
                    .into_iter()
                    .zip(std::mem::take(map).into_iter().map(|(_, v)| v))
                    .collect();
                entries.sort_by_key(|(index, _)| *index);
                *value = Value::Array(entries.into_iter().map(|(_, v)| v).collect());
            }
        }
        _ => {}
    }
}

/// Percent-decoding with `+` as space; invalid escapes are kept literally.
fn urlencoding_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut result = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                let decoded = s
                    .get(i + 1..i + 3)
                    .and_then(|hex| u8::from_str_radix(hex, 16).ok());
                match decoded {
                    Some(byte) => {
                        result.push(byte);
                        i += 3;
                        continue;
                    }
                    None => result.push(b'%'),
                }
            }
            b'+' => result.push(b' '),
            byte => result.push(byte),
        }
        i += 1;
    }

    String::from_utf8_lossy(&result).into_owned()
}
