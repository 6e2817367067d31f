//! # oxide-formtree
//!
//! Schema-driven form rendering and processing.
//!
//! A form is a tree of [`Element`]s. The same tree drives both directions:
//!
//! - rendering: schema + values tree → HTML markup
//! - processing: schema + posted input tree → sanitized values tree
//!
//! Composite elements nest their values under their key, and repeatable
//! (`multiple`) elements render a client-side template plus one instance per
//! existing entry.
//!
//! ## Quick Start
//!
//! ```rust
//! use oxide_formtree::{options, Element, FormEngine};
//! use serde_json::{json, Map};
//!
//! let form = Element::new()
//!     .id("profile")
//!     .child("name", Element::text().label("Name"))
//!     .child("color", Element::select(options([("r", "Red"), ("b", "Blue")])))
//!     .child("agree", Element::checkbox().label("I agree"));
//!
//! let engine = FormEngine::new();
//! let html = engine.render_form(&form, &Map::new()).unwrap();
//! assert!(html.contains(r#"name="name""#));
//!
//! let mut values = Map::new();
//! engine
//!     .process_form(&form, &mut values, &json!({"name": "<b>Bob</b>", "color": "b"}))
//!     .unwrap();
//! assert_eq!(values["name"], json!("Bob"));
//! assert_eq!(values["agree"], json!(false));
//! ```
//!
//! ## JSON Schemas
//!
//! ```rust
//! use oxide_formtree::{FormEngine, Schema};
//! use serde_json::Map;
//!
//! let form = Schema::from_str(r##"{
//!     "address": {
//!         "#type": "composite",
//!         "street": {"#type": "text"}
//!     }
//! }"##).unwrap();
//!
//! let html = FormEngine::new().render_form(&form, &Map::new()).unwrap();
//! assert!(html.contains(r#"name="address[street]""#));
//! ```
//!
//! ## Posted Bodies
//!
//! [`parse_urlencoded`] turns a browser post into the input tree the
//! processor expects; [`flatten_values`] goes the other way.

mod attrs;
mod config;
pub mod element;
mod engine;
mod error;
pub mod escape;
pub mod hooks;
mod multiple;
mod naming;
mod options;
pub mod posted;
mod process;
mod render;
mod schema;
pub mod search;
pub mod tag;
pub mod widgets;

pub use attrs::Attrs;
pub use config::FormConfig;
pub use element::{
    options, Conditional, Element, ElementType, InstanceIndex, LabelPosition, OptionEntry, Options,
    INDEX_PLACEHOLDER,
};
pub use engine::FormEngine;
pub use error::{FormError, Result};
pub use escape::{Escaper, HtmlEscaper};
pub use hooks::{Asset, Hooks};
pub use naming::{child_elements, derive_child_identity, with_defaults};
pub use posted::{flatten_values, from_pairs, parse_urlencoded};
pub use schema::Schema;
pub use search::{MemoryRecords, PostSearch, Record, RecordSource, SearchResponse, TermSearch};
pub use tag::{make_tag, TagContent};
pub use widgets::{AttachmentKind, NoWidgets, Widgets};
