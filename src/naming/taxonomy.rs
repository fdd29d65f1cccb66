//! Ordered category keyword table.
//!
//! Order matters: when two categories score the same, the one listed first
//! names the cluster.

use serde::{Deserialize, Serialize};

/// A category: lookup key, optional display label and keyword substrings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub keywords: Vec<String>,
}

impl Category {
    pub fn new(key: &str, label: &str, keywords: &[&str]) -> Self {
        Self {
            key: key.to_string(),
            label: Some(label.to_string()),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    /// True if any keyword occurs inside `token`.
    pub fn matches(&self, token: &str) -> bool {
        self.keywords.iter().any(|k| token.contains(k.as_str()))
    }

    /// Configured label, or the capitalized key when none is set.
    pub fn display_label(&self) -> String {
        match &self.label {
            Some(label) => label.clone(),
            None => super::capitalize(&self.key),
        }
    }
}

/// Categories in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryTable {
    categories: Vec<Category>,
}

impl CategoryTable {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.key == key)
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self::new(vec![
            Category::new(
                "medical",
                "Medical / Healthcare",
                &[
                    "hernia",
                    "arthritis",
                    "transplant",
                    "orthopedic",
                    "orthopaedic",
                    "implant",
                    "orthosis",
                    "orthotics",
                    "organ",
                    "surgery",
                    "disease",
                    "health",
                    "clinic",
                    "hospital",
                    "therapy",
                    "physio",
                ],
            ),
            Category::new(
                "finance",
                "Finance / Payroll",
                &[
                    "payroll",
                    "salary",
                    "compensation",
                    "dividend",
                    "benefits",
                    "finance",
                    "financial",
                    "account",
                    "budget",
                    "billing",
                ],
            ),
            Category::new(
                "management",
                "Management",
                &[
                    "management",
                    "admin",
                    "administration",
                    "supervision",
                    "planning",
                    "operations",
                    "organizing",
                    "executive",
                ],
            ),
            Category::new(
                "construction",
                "Construction / Materials",
                &[
                    "building",
                    "construction",
                    "structure",
                    "material",
                    "cement",
                    "hardware",
                    "tools",
                    "fabrication",
                ],
            ),
            Category::new(
                "technology",
                "Technology & Systems",
                &[
                    "software",
                    "system",
                    "network",
                    "tech",
                    "cloud",
                    "data",
                    "ai",
                    "algorithm",
                    "digital",
                    "application",
                ],
            ),
            Category::new(
                "creative",
                "Creative / Design",
                &[
                    "creative",
                    "design",
                    "art",
                    "drawing",
                    "graphics",
                    "direction",
                    "illustration",
                    "content",
                    "media",
                ],
            ),
            Category::new(
                "education",
                "Education & Training",
                &[
                    "training",
                    "learning",
                    "course",
                    "education",
                    "teaching",
                    "study",
                ],
            ),
            Category::new(
                "legal",
                "Legal & Compliance",
                &["law", "legal", "compliance", "regulation", "contract"],
            ),
        ])
    }
}
