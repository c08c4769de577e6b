use std::fmt;

/// A single non-empty, trimmed statement taken from a script.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Statement(String);

impl Statement {
    /// Create a statement from a script fragment; `None` when the fragment is blank.
    #[must_use]
    pub fn new(fragment: &str) -> Option<Self> {
        let fragment = fragment.trim();
        if fragment.is_empty() {
            None
        } else {
            Some(Statement(fragment.to_string()))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Single line rendition of the statement for progress messages. Whitespace runs are
    /// collapsed and the text is cut at `length` characters, with `...` marking the cut.
    #[must_use]
    pub fn preview(&self, length: usize) -> String {
        let collapsed = self.0.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.chars().count() <= length {
            return collapsed;
        }

        let mut preview: String = collapsed.chars().take(length).collect();
        preview.push_str("...");
        preview
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
