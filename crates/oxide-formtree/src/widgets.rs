//! Client-side widget collaborators.
//!
//! The rich-text editor and the attachment picker are opaque to the engine:
//! it hands them the current value and the wire name and embeds whatever
//! markup they return.

/// Kind of attachment a picker selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    /// Any attachment.
    Attachment,
    /// Images only.
    Image,
}

impl AttachmentKind {
    /// Returns the schema type name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Attachment => "attachment",
            Self::Image => "image",
        }
    }
}

/// Renders rich client-side widgets.
pub trait Widgets: Send + Sync {
    /// Whether the current user may use the rich-text editor.
    ///
    /// When `false`, rich-text elements degrade to an HTML-allowing textarea.
    fn can_rich_edit(&self) -> bool;

    /// Markup of a rich-text editor bound to `field_name`.
    fn rich_text_editor(&self, value: &str, editor_id: &str, field_name: &str) -> String;

    /// Preview markup rendered next to an attachment id field.
    fn attachment_picker(&self, value: &str, field_name: &str, kind: AttachmentKind) -> String;
}

/// No rich editing, no widget markup: every widget degrades to its plain field.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoWidgets;

impl Widgets for NoWidgets {
    fn can_rich_edit(&self) -> bool {
        false
    }

    fn rich_text_editor(&self, _value: &str, _editor_id: &str, _field_name: &str) -> String {
        String::new()
    }

    fn attachment_picker(&self, _value: &str, _field_name: &str, _kind: AttachmentKind) -> String {
        String::new()
    }
}
