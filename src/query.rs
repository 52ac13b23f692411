/// What typing into the search field should lead to once the input settles
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchIntent {
    /// Search for the trimmed term
    Search(String),
    /// The field was cleared: go back to the default listing
    Reset,
    /// Too short to search, not empty either
    Ignore,
}

impl SearchIntent {
    /// Classifies a raw query. Terms longer than `min_len` characters are searched.
    #[must_use]
    pub fn classify(raw: &str, min_len: usize) -> Self {
        let term = raw.trim();
        match term.chars().count() {
            0 => SearchIntent::Reset,
            len if len > min_len => SearchIntent::Search(term.to_string()),
            _ => SearchIntent::Ignore,
        }
    }
}
