use std::sync::Arc;

use crate::rules::KeywordRules;

const GREETING: &str = "Hi there! How can I help you?";

/// A decoded update from the platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundUpdate {
    InlineQuery { id: String, query_text: String },
    DirectMessage { chat_id: i64, text: String },
    Unrecognized,
}

impl InboundUpdate {
    /// Short label for logging
    pub fn kind(&self) -> &'static str {
        match self {
            InboundUpdate::InlineQuery { .. } => "inline_query",
            InboundUpdate::DirectMessage { .. } => "message",
            InboundUpdate::Unrecognized => "unrecognized",
        }
    }
}

/// A static inline suggestion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineResult {
    pub id: String,
    pub title: String,
    pub description: String,
    pub message_text: String,
}

/// What the caller should send back to the platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyAction {
    AnswerInlineQuery {
        query_id: String,
        results: Vec<InlineResult>,
    },
    SendMessage {
        chat_id: i64,
        text: String,
    },
    NoAction,
}

/// Maps one inbound update to one reply action. No I/O.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    rules: Arc<KeywordRules>,
}

impl Dispatcher {
    pub fn new(rules: KeywordRules) -> Self {
        Self {
            rules: Arc::new(rules),
        }
    }

    pub fn dispatch(&self, update: InboundUpdate) -> ReplyAction {
        match update {
            InboundUpdate::InlineQuery { id, query_text } => ReplyAction::AnswerInlineQuery {
                query_id: id,
                results: self.inline_results(&query_text),
            },
            InboundUpdate::DirectMessage { chat_id, text } => ReplyAction::SendMessage {
                chat_id,
                text: self.rules.reply_for(&text).to_string(),
            },
            InboundUpdate::Unrecognized => ReplyAction::NoAction,
        }
    }

    // Results appear in the order the checks run.
    fn inline_results(&self, query_text: &str) -> Vec<InlineResult> {
        let query = query_text.trim().to_lowercase();
        let mut results = Vec::new();

        if query.is_empty() || query == "help" {
            results.push(self.help_result());
        }

        if query.contains("hello") {
            results.push(InlineResult {
                id: "2".to_string(),
                title: "Greet".to_string(),
                description: "Say Hello".to_string(),
                message_text: GREETING.to_string(),
            });
        }

        results
    }

    fn help_result(&self) -> InlineResult {
        let mut text = String::from("Available commands:");
        for keyword in self.rules.keywords() {
            text.push_str(&format!("\n- {}", keyword));
        }
        InlineResult {
            id: "1".to_string(),
            title: "Help".to_string(),
            description: "List available commands.".to_string(),
            message_text: text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{KeywordRule, FALLBACK_REPLY};

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(KeywordRules::default())
    }

    fn message(text: &str) -> InboundUpdate {
        InboundUpdate::DirectMessage {
            chat_id: 42,
            text: text.to_string(),
        }
    }

    fn inline(query: &str) -> InboundUpdate {
        InboundUpdate::InlineQuery {
            id: "q1".to_string(),
            query_text: query.to_string(),
        }
    }

    fn inline_titles(action: &ReplyAction) -> Vec<&str> {
        match action {
            ReplyAction::AnswerInlineQuery { results, .. } => {
                results.iter().map(|r| r.title.as_str()).collect()
            }
            other => panic!("expected inline answer, got {:?}", other),
        }
    }

    #[test]
    fn test_message_hello() {
        assert_eq!(
            dispatcher().dispatch(message("Well HELLO friend")),
            ReplyAction::SendMessage {
                chat_id: 42,
                text: "Hi there! How can I help you?".to_string(),
            }
        );
    }

    #[test]
    fn test_message_bye() {
        assert_eq!(
            dispatcher().dispatch(message("Bye")),
            ReplyAction::SendMessage {
                chat_id: 42,
                text: "Goodbye! Have a great day!".to_string(),
            }
        );
    }

    #[test]
    fn test_message_without_keyword() {
        assert_eq!(
            dispatcher().dispatch(message("xyz123")),
            ReplyAction::SendMessage {
                chat_id: 42,
                text: FALLBACK_REPLY.to_string(),
            }
        );
    }

    #[test]
    fn test_inline_empty_query_returns_help() {
        let action = dispatcher().dispatch(inline("   "));
        assert_eq!(inline_titles(&action), vec!["Help"]);
    }

    #[test]
    fn test_inline_help_lists_keywords() {
        let action = dispatcher().dispatch(inline("HELP"));
        match action {
            ReplyAction::AnswerInlineQuery { query_id, results } => {
                assert_eq!(query_id, "q1");
                assert_eq!(results.len(), 1);
                assert_eq!(results[0].id, "1");
                assert_eq!(
                    results[0].message_text,
                    "Available commands:\n- hello\n- hi\n- how are you\n- bye\n- help"
                );
            }
            other => panic!("expected inline answer, got {:?}", other),
        }
    }

    #[test]
    fn test_inline_hello_returns_greeting_only() {
        let action = dispatcher().dispatch(inline("hello there"));
        assert_eq!(inline_titles(&action), vec!["Greet"]);
    }

    #[test]
    fn test_inline_unknown_query_returns_no_results() {
        let action = dispatcher().dispatch(inline("weather"));
        assert!(inline_titles(&action).is_empty());
    }

    #[test]
    fn test_unrecognized_yields_no_action() {
        assert_eq!(
            dispatcher().dispatch(InboundUpdate::Unrecognized),
            ReplyAction::NoAction
        );
    }

    #[test]
    fn test_dispatch_is_deterministic() {
        let d = dispatcher();
        for update in [message("hi there"), inline(""), inline("hello"), message("?")] {
            assert_eq!(d.dispatch(update.clone()), d.dispatch(update));
        }
    }

    #[test]
    fn test_custom_rules_are_used() {
        let rules = KeywordRules::new(vec![KeywordRule::new("ping", "pong")]).unwrap();
        let d = Dispatcher::new(rules);
        assert_eq!(
            d.dispatch(message("PING")),
            ReplyAction::SendMessage {
                chat_id: 42,
                text: "pong".to_string(),
            }
        );
        match d.dispatch(inline("")) {
            ReplyAction::AnswerInlineQuery { results, .. } => {
                assert_eq!(results[0].message_text, "Available commands:\n- ping");
            }
            other => panic!("expected inline answer, got {:?}", other),
        }
    }
}
