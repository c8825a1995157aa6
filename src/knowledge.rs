//! Topic keyword to explanation lookup
//!
//! Entries are kept in definition order. Lookup returns the first keyword
//! contained in the message, so earlier entries win ties.

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct KnowledgeEntry {
    pub(crate) keyword: String,
    pub(crate) explanation: String,
}

impl KnowledgeEntry {
    fn new(keyword: &str, explanation: &str) -> Self {
        Self {
            keyword: keyword.to_string(),
            explanation: explanation.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct KnowledgeBase {
    entries: Vec<KnowledgeEntry>,
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::builtin()
    }
}

impl KnowledgeBase {
    pub(crate) fn builtin() -> Self {
        Self {
            entries: vec![
                KnowledgeEntry::new(
                    "ai",
                    "AI stands for Artificial Intelligence. It's the simulation of human intelligence processes by machines.",
                ),
                KnowledgeEntry::new(
                    "python",
                    "Python is a high-level, interpreted programming language known for its readability and versatility.",
                ),
                KnowledgeEntry::new(
                    "gradio",
                    "Gradio is a Python library that allows you to quickly create user interfaces for machine learning models.",
                ),
                KnowledgeEntry::new(
                    "regex",
                    "Regex, or Regular Expressions, is a sequence of characters that form a search pattern. It's used for string matching.",
                ),
                KnowledgeEntry::new(
                    "machine learning",
                    "Machine learning is a subset of AI that focuses on the development of algorithms that allow computers to learn from and make predictions based on data.",
                ),
                KnowledgeEntry::new(
                    "deep learning",
                    "Deep learning is a subset of machine learning that uses neural networks with many layers to analyze various factors of data.",
                ),
                KnowledgeEntry::new(
                    "data science",
                    "Data science is a field that uses scientific methods, processes, algorithms, and systems to extract knowledge and insights from structured and unstructured data.",
                ),
            ],
        }
    }

    /// Append entries after the existing ones. Keywords are lowercased; ones
    /// already present are skipped.
    pub(crate) fn with_entries(mut self, extra: &[KnowledgeEntry]) -> Self {
        for entry in extra {
            let keyword = entry.keyword.trim().to_lowercase();
            if keyword.is_empty() || self.entries.iter().any(|e| e.keyword == keyword) {
                continue;
            }
            self.entries.push(KnowledgeEntry {
                keyword,
                explanation: entry.explanation.clone(),
            });
        }
        self
    }

    /// First entry whose keyword occurs in `message_lower`.
    pub(crate) fn lookup(&self, message_lower: &str) -> Option<&KnowledgeEntry> {
        self.entries
            .iter()
            .find(|entry| message_lower.contains(entry.keyword.as_str()))
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
