use anyhow::Result;
use serde::Deserialize;
use tracing::debug;

/// Reply sent when no keyword matches
pub const FALLBACK_REPLY: &str =
    "I'm not sure how to respond to that. Try saying 'help' for more information.";

/// A single trigger substring and its canned reply
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct KeywordRule {
    pub keyword: String,
    pub reply: String,
}

impl KeywordRule {
    pub fn new(keyword: impl Into<String>, reply: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            reply: reply.into(),
        }
    }
}

/// Ordered, read-only keyword table. First match wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordRules {
    rules: Vec<KeywordRule>,
}

impl KeywordRules {
    /// Build a table from configured rules.
    /// Keywords are stored lower-cased so matching stays case-insensitive.
    pub fn new(rules: Vec<KeywordRule>) -> Result<Self> {
        let mut normalized = Vec::with_capacity(rules.len());
        for (index, rule) in rules.into_iter().enumerate() {
            let keyword = rule.keyword.trim().to_lowercase();
            if keyword.is_empty() {
                anyhow::bail!("Rule #{} has an empty keyword", index + 1);
            }
            if rule.reply.trim().is_empty() {
                anyhow::bail!("Rule '{}' has an empty reply", keyword);
            }
            normalized.push(KeywordRule {
                keyword,
                reply: rule.reply,
            });
        }
        Ok(Self { rules: normalized })
    }

    /// Find the reply for a message.
    ///
    /// Matching is unanchored substring containment, so "history" matches "hi".
    pub fn reply_for(&self, message: &str) -> &str {
        let message = message.to_lowercase();
        match self.rules.iter().find(|rule| message.contains(&rule.keyword)) {
            Some(rule) => {
                debug!("Matched keyword '{}'", rule.keyword);
                &rule.reply
            }
            None => FALLBACK_REPLY,
        }
    }

    /// Keywords in table order
    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|rule| rule.keyword.as_str())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for KeywordRules {
    fn default() -> Self {
        Self {
            rules: default_rules(),
        }
    }
}

pub fn default_rules() -> Vec<KeywordRule> {
    vec![
        KeywordRule::new("hello", "Hi there! How can I help you?"),
        KeywordRule::new("hi", "Hello! What can I do for you today?"),
        KeywordRule::new(
            "how are you",
            "I'm just a bot, but I'm doing great! What about you?",
        ),
        KeywordRule::new("bye", "Goodbye! Have a great day!"),
        KeywordRule::new(
            "help",
            "I can help you with basic conversations. Try saying hello!",
        ),
    ]
}
