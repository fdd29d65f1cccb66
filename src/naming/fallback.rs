//! Frequency-based naming for clusters no category matched.

use super::{capitalize, tokenize};
use std::collections::HashMap;

/// Name used when a cluster has no usable words at all.
pub const GENERAL_CATEGORY: &str = "General Category";

const FALLBACK_TOKEN_MIN_EXCLUSIVE: usize = 3;

/// Combine the two most frequent words (longer than three characters) of the
/// member names.
///
/// Equal counts are ordered by the word itself, so the result depends only
/// on the multiset of names and not on member order.
pub fn fallback_name<S: AsRef<str>>(names: &[S]) -> String {
    let mut frequency: HashMap<String, usize> = HashMap::new();
    for name in names {
        for token in tokenize(name.as_ref(), FALLBACK_TOKEN_MIN_EXCLUSIVE) {
            *frequency.entry(token).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<(String, usize)> = frequency.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    match ranked.as_slice() {
        [] => GENERAL_CATEGORY.to_string(),
        [(only, _)] => capitalize(only),
        [(first, _), (second, _), ..] => {
            format!("{} & {}", capitalize(first), capitalize(second))
        }
    }
}
