//! Deterministic cluster naming from member display names.
//!
//! The primary strategy scores every category of a [`CategoryTable`] by the
//! number of member-name tokens containing one of its keywords. When no
//! token matches any keyword the [`fallback_name`] strategy builds a name
//! from the most frequent words instead.
//!
//! # Examples
//!
//! ```
//! use densegroup::naming::ClusterNamer;
//!
//! let namer = ClusterNamer::default();
//! let name = namer.name(&["Orthopedic Surgeon", "Hospital Administrator", "Clinic Nurse"]);
//! assert_eq!(name, "Medical / Healthcare");
//! ```

mod fallback;
mod taxonomy;

pub use fallback::{fallback_name, GENERAL_CATEGORY};
pub use taxonomy::{Category, CategoryTable};

/// Tokens shorter than this (or equal) are ignored when scoring categories.
const CATEGORY_TOKEN_MIN_EXCLUSIVE: usize = 2;

/// Names clusters using an ordered category table.
#[derive(Debug, Clone, Default)]
pub struct ClusterNamer {
    table: CategoryTable,
}

impl ClusterNamer {
    pub fn new(table: CategoryTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &CategoryTable {
        &self.table
    }

    /// Score per category, in table order.
    ///
    /// Each token adds one to every category with a keyword inside it, so a
    /// single token may count for several categories.
    pub fn scores<S: AsRef<str>>(&self, names: &[S]) -> Vec<usize> {
        let mut scores = vec![0; self.table.len()];

        for name in names {
            for token in tokenize(name.as_ref(), CATEGORY_TOKEN_MIN_EXCLUSIVE) {
                for (score, category) in scores.iter_mut().zip(self.table.categories()) {
                    if category.matches(&token) {
                        *score += 1;
                    }
                }
            }
        }

        scores
    }

    /// Highest scoring category; the earliest one wins a tie. `None` when
    /// nothing matched.
    pub fn best_category<S: AsRef<str>>(&self, names: &[S]) -> Option<&Category> {
        let scores = self.scores(names);
        let mut best: Option<(usize, usize)> = None;

        for (index, &score) in scores.iter().enumerate() {
            if score > 0 && best.is_none_or(|(_, top)| score > top) {
                best = Some((index, score));
            }
        }

        best.map(|(index, _)| &self.table.categories()[index])
    }

    /// Display name for a cluster with the given member names.
    pub fn name<S: AsRef<str>>(&self, names: &[S]) -> String {
        match self.best_category(names) {
            Some(category) => category.display_label(),
            None => fallback_name(names),
        }
    }
}

/// Lowercase, blank out everything except ASCII letters, digits and
/// whitespace, split on whitespace and keep tokens longer than
/// `min_exclusive` characters.
pub fn tokenize(name: &str, min_exclusive: usize) -> Vec<String> {
    let cleaned: String = name
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    cleaned
        .split_whitespace()
        .filter(|token| token.len() > min_exclusive)
        .map(str::to_string)
        .collect()
}

/// Uppercase the first character, leave the rest untouched.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
