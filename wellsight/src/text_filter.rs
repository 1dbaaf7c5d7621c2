//! Comma-separated include/exclude text filter for the item table columns.

/// A text filter such as `"wopr, -p2"`.
///
/// Terms are comma separated and matched case-insensitively as substrings.
/// A leading `-` turns a term into an exclusion. Text passes when no
/// exclusion matches and, if any inclusions exist, at least one matches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextFilter {
    pattern: String,
    include: Vec<String>,
    exclude: Vec<String>,
}

impl TextFilter {
    pub fn new(pattern: impl Into<String>) -> Self {
        let mut filter = Self::default();
        filter.set(pattern);
        filter
    }

    /// Replace the pattern and re-parse its terms.
    pub fn set(&mut self, pattern: impl Into<String>) {
        self.pattern = pattern.into();
        self.include.clear();
        self.exclude.clear();

        for term in self.pattern.split(',').map(str::trim) {
            match term.strip_prefix('-') {
                Some(excluded) => {
                    let excluded = excluded.trim();
                    if !excluded.is_empty() {
                        self.exclude.push(excluded.to_lowercase());
                    }
                }
                None if !term.is_empty() => self.include.push(term.to_lowercase()),
                None => {}
            }
        }
    }

    /// The pattern as typed.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Whether any term is set.
    pub fn is_active(&self) -> bool {
        !self.include.is_empty() || !self.exclude.is_empty()
    }

    pub fn clear(&mut self) {
        self.set(String::new());
    }

    pub fn passes(&self, text: &str) -> bool {
        if !self.is_active() {
            return true;
        }

        let text = text.to_lowercase();
        if self.exclude.iter().any(|term| text.contains(term.as_str())) {
            return false;
        }

        self.include.is_empty() || self.include.iter().any(|term| text.contains(term.as_str()))
    }
}
