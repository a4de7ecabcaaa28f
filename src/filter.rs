use crate::docs::DocRef;

/// Result of applying a language filter to a document list.
///
/// Unmatched documents are kept and surfaced to the caller rather than
/// silently dropped — the parenthetical tag convention is a best-effort
/// heuristic, not a guaranteed classifier.
#[derive(Debug, Clone)]
pub struct FilterOutcome {
    /// Documents whose text carries one of the wanted language tags
    pub matched: Vec<DocRef>,
    /// Documents without any wanted tag (possibly untagged at all)
    pub unmatched: Vec<DocRef>,
}

/// Filter selecting document versions by the language annotation embedded
/// in link text, e.g. `(EV)` for English, `(IV)` for Irish, `(BV)` for
/// bilingual papers
#[derive(Debug, Clone)]
pub struct LanguageFilter {
    codes: Vec<String>,
}

impl LanguageFilter {
    /// Create a filter for the given language codes (case-insensitive)
    pub fn new(codes: Vec<String>) -> Self {
        let codes = codes
            .into_iter()
            .map(|c| c.trim().to_uppercase())
            .filter(|c| !c.is_empty())
            .collect();
        Self { codes }
    }

    /// Parse a comma-separated code list such as `"EV,BV"`.
    ///
    /// `"all"` (any case) disables filtering and returns `None`.
    pub fn parse(value: &str) -> Option<Self> {
        if value.trim().eq_ignore_ascii_case("all") {
            return None;
        }
        Some(Self::new(value.split(',').map(str::to_string).collect()))
    }

    /// The codes this filter accepts
    pub fn codes(&self) -> &[String] {
        &self.codes
    }

    /// Whether the document text carries one of the wanted tags
    pub fn matches(&self, text: &str) -> bool {
        let text = text.to_uppercase();
        self.codes
            .iter()
            .any(|code| text.contains(&format!("({})", code)))
    }

    /// Split a document list into matched and unmatched sets
    pub fn partition(&self, docs: Vec<DocRef>) -> FilterOutcome {
        let (matched, unmatched) = docs.into_iter().partition(|d| self.matches(&d.text));
        FilterOutcome { matched, unmatched }
    }
}
