use kiln_core::context::{ContextElement, StringContext};
use std::fmt::Display;
use std::sync::Arc;

/// A string value together with the context describing what it depends on.
///
/// Both halves sit behind [`Arc`] so cloning a string during evaluation
/// never copies the text or the context. Strings are immutable: every
/// operation hands back a new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KilnString {
    text: Arc<str>,
    // kept normalized: None iff the context is empty,
    // so has_context is a tag check and Eq stays structural
    context: Option<Arc<StringContext>>,
}

impl KilnString {
    /// a string with empty context
    pub fn new<T>(text: T) -> Self
    where
        T: Into<Arc<str>>,
    {
        Self {
            text: text.into(),
            context: None,
        }
    }

    pub fn from_parts<T>(text: T, context: StringContext) -> Self
    where
        T: Into<Arc<str>>,
    {
        Self {
            text: text.into(),
            context: wrap(context),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn has_context(&self) -> bool {
        self.context.is_some()
    }

    pub fn context(&self) -> Option<&StringContext> {
        self.context.as_deref()
    }

    pub fn iter_context(&self) -> impl Iterator<Item = &ContextElement> {
        self.context.as_deref().into_iter().flatten()
    }

    /// the same text carrying `context` instead of the current one
    pub fn with_context(&self, context: StringContext) -> KilnString {
        KilnString {
            text: Arc::clone(&self.text),
            context: wrap(context),
        }
    }

    /// the same text with the context dropped
    pub fn without_context(&self) -> KilnString {
        KilnString {
            text: Arc::clone(&self.text),
            context: None,
        }
    }

    /// the texts joined and the contexts unioned
    pub fn concat(&self, other: &KilnString) -> KilnString {
        let mut text = String::with_capacity(self.text.len() + other.text.len());
        text.push_str(&self.text);
        text.push_str(&other.text);
        let context = match (&self.context, &other.context) {
            (None, None) => None,
            (Some(c), None) | (None, Some(c)) => Some(Arc::clone(c)),
            (Some(a), Some(b)) => wrap(a.union(b)),
        };
        KilnString {
            text: text.into(),
            context,
        }
    }
}

fn wrap(context: StringContext) -> Option<Arc<StringContext>> {
    if context.is_empty() {
        None
    } else {
        Some(Arc::new(context))
    }
}

impl From<&str> for KilnString {
    fn from(text: &str) -> Self {
        KilnString::new(text)
    }
}

impl From<String> for KilnString {
    fn from(text: String) -> Self {
        KilnString::new(text)
    }
}

impl Display for KilnString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}
