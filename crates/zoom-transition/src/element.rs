//! The controlled element.
//!
//! The controller never renders anything itself. It writes [`StylePatch`]es
//! through [`TransitionElement`] and asks it for a size hint; how the element
//! is laid out or painted belongs to the host.
//!
//! [`StyledElement`] is an in-memory element that keeps its inline style as a
//! declaration map, for hosts that read styles back and for tests.

use std::collections::BTreeMap;
use std::fmt;

use crate::style::StylePatch;

/// Element driven by a transition controller.
pub trait TransitionElement {
    /// Assign a style patch. `None` values in the patch remove the property.
    fn apply_style(&mut self, patch: &StylePatch);

    /// Largest box dimension in px, if layout information is available.
    fn measure(&self) -> Option<f64> {
        None
    }

    /// Whether the element is still part of a live tree.
    fn is_attached(&self) -> bool {
        true
    }
}

/// Inline style declarations keyed by property name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineStyle {
    declarations: BTreeMap<String, String>,
}

impl InlineStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.declarations.get(property).map(String::as_str)
    }

    pub fn set(&mut self, property: &str, value: impl Into<String>) {
        self.declarations.insert(property.to_string(), value.into());
    }

    pub fn remove(&mut self, property: &str) -> Option<String> {
        self.declarations.remove(property)
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Write every declaration of a patch.
    pub fn apply(&mut self, patch: &StylePatch) {
        for (property, value) in patch.declarations() {
            match value {
                Some(value) => self.set(property, value),
                None => {
                    self.remove(property);
                }
            }
        }
    }
}

impl fmt::Display for InlineStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (property, value)) in self.declarations.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{property}: {value}")?;
        }
        Ok(())
    }
}

/// In-memory element with an id, an inline style and an optional box size.
#[derive(Debug, Clone, PartialEq)]
pub struct StyledElement {
    id: String,
    style: InlineStyle,
    size: Option<(f64, f64)>,
    attached: bool,
}

impl StyledElement {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            style: InlineStyle::new(),
            size: None,
            attached: true,
        }
    }

    /// Give the element a measurable box.
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.size = Some((width, height));
        self
    }

    /// Seed an inline declaration, as if authored by the host.
    pub fn with_style(mut self, property: &str, value: &str) -> Self {
        self.style.set(property, value);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn style(&self) -> &InlineStyle {
        &self.style
    }

    pub fn set_size(&mut self, width: f64, height: f64) {
        self.size = Some((width, height));
    }

    /// Detach the element from its tree.
    pub fn detach(&mut self) {
        self.attached = false;
    }
}

impl TransitionElement for StyledElement {
    fn apply_style(&mut self, patch: &StylePatch) {
        self.style.apply(patch);
    }

    fn measure(&self) -> Option<f64> {
        self.size.map(|(width, height)| width.max(height))
    }

    fn is_attached(&self) -> bool {
        self.attached
    }
}
