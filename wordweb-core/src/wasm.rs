//! WASM bindings for the wordweb-core library.
//!
//! The browser side owns the word source: it calls `start`/`expand` to get a ticket,
//! performs the model request itself, then hands the raw response back through
//! `complete` (or reports a transport error through `fail`). All results cross the
//! boundary as JSON strings.

use serde::Serialize;
use serde_json::json;
use wasm_bindgen::prelude::*;

use crate::config::EngineConfig;
use crate::expansion::{self, ExpansionTicket, MindMap};
use crate::tree::NodeId;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console, js_name = error)]
    pub fn console_error(s: &str);
}

fn error_json(message: &str) -> String {
    json!({ "error": message }).to_string()
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| error_json(&e.to_string()))
}

fn parse_ticket(ticket_json: &str) -> Result<ExpansionTicket, String> {
    serde_json::from_str(ticket_json).map_err(|e| format!("Invalid ticket: {}", e))
}

/// One mind-map session, owned by the page.
#[wasm_bindgen]
pub struct WordWeb {
    map: MindMap,
}

#[wasm_bindgen]
impl WordWeb {
    /// Create a session. `config_json` may be empty or a partial config object;
    /// an invalid config falls back to the defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> WordWeb {
        let config = match EngineConfig::from_json(config_json) {
            Ok(config) => config,
            Err(e) => {
                console_error(&format!("Error reading config: {}", e));
                EngineConfig::default()
            }
        };
        WordWeb { map: MindMap::new(config) }
    }

    /// Start a new map from `word`. Returns the root's expansion ticket as JSON.
    pub fn start(&mut self, word: &str) -> String {
        match self.map.start(word) {
            Ok(ticket) => to_json(&ticket),
            Err(e) => {
                console_error(&format!("Error starting map: {}", e));
                error_json(&e.to_string())
            }
        }
    }

    /// Handle a click on a node. Returns a ticket as JSON, or `null` when the node is
    /// already loading or expanded.
    pub fn expand(&mut self, node_id: &str) -> String {
        match self.map.begin_expansion(&NodeId::from(node_id)) {
            Ok(ticket) => to_json(&ticket),
            Err(e) => {
                console_error(&format!("Error expanding node: {}", e));
                error_json(&e.to_string())
            }
        }
    }

    /// Deliver the model response for a ticket. A response that does not match the
    /// expected schema counts as a failed call.
    pub fn complete(&mut self, ticket_json: &str, response_json: &str) -> String {
        let ticket = match parse_ticket(ticket_json) {
            Ok(ticket) => ticket,
            Err(msg) => {
                console_error(&msg);
                return error_json(&msg);
            }
        };

        let result = match expansion::parse_related_words(response_json) {
            Ok(words) => self.map.complete_expansion(&ticket, &words),
            Err(e) => self.map.fail_expansion(&ticket, &e.to_string()),
        };
        match result {
            Ok(outcome) => to_json(&outcome),
            Err(e) => {
                console_error(&format!("Error completing expansion: {}", e));
                error_json(&e.to_string())
            }
        }
    }

    /// Report that the model request for a ticket failed.
    pub fn fail(&mut self, ticket_json: &str, message: &str) -> String {
        let ticket = match parse_ticket(ticket_json) {
            Ok(ticket) => ticket,
            Err(msg) => {
                console_error(&msg);
                return error_json(&msg);
            }
        };
        match self.map.fail_expansion(&ticket, message) {
            Ok(outcome) => to_json(&outcome),
            Err(e) => {
                console_error(&format!("Error failing expansion: {}", e));
                error_json(&e.to_string())
            }
        }
    }

    pub fn reset(&mut self) {
        self.map.reset();
    }

    /// Current map for the renderer, as JSON.
    pub fn render(&self) -> String {
        to_json(&self.map.render())
    }
}

/// Prompt for a related-words request. `existing_json` is a JSON array of strings.
#[wasm_bindgen]
pub fn related_words_prompt(word: &str, existing_json: &str) -> String {
    let existing: Vec<String> = match serde_json::from_str(existing_json) {
        Ok(words) => words,
        Err(e) => {
            console_error(&format!("Error reading existing words: {}", e));
            Vec::new()
        }
    };
    expansion::related_words_prompt(word, &existing)
}

/// JSON schema the model response must follow.
#[wasm_bindgen]
pub fn related_words_schema() -> String {
    expansion::related_words_schema().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn make_session() -> WordWeb {
        WordWeb::new("")
    }

    fn parse(json: &str) -> Value {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_malformed_response_fails_root() {
        let mut web = make_session();
        let ticket = web.start("Creativity");

        let outcome = parse(&web.complete(&ticket, r#"{"words": 5}"#));
        assert_eq!(outcome["kind"], "failed");

        let map = parse(&web.render());
        assert_eq!(map["nodes"][0]["id"], "root");
        assert_eq!(map["nodes"][0]["state"], "collapsed");
        assert_eq!(map["error"]["message"], expansion::FAILED_MESSAGE);
        assert!(map.get("edges").is_none());
    }

    #[test]
    fn test_retry_after_failure_filters_duplicates() {
        let mut web = make_session();
        let ticket = web.start("Creativity");
        web.complete(&ticket, "not json");

        let ticket = web.expand("root");
        assert_ne!(ticket, "null");
        let outcome = parse(&web.complete(
            &ticket,
            r#"{"words": ["Art", "art", "creativity", " Music "]}"#,
        ));
        assert_eq!(outcome["kind"], "expanded");
        assert_eq!(outcome["children"], serde_json::json!(["root-0", "root-1"]));

        let map = parse(&web.render());
        let words: Vec<&str> = map["nodes"]
            .as_array()
            .unwrap()
            .iter()
            .map(|n| n["word"].as_str().unwrap())
            .collect();
        assert_eq!(words, vec!["Creativity", "Art", "Music"]);
        assert_eq!(map["nodes"][0]["state"], "expanded");
        assert_eq!(map["edges"].as_array().unwrap().len(), 2);

        // Already expanded: nothing to hand out.
        assert_eq!(web.expand("root"), "null");
    }

    #[test]
    fn test_expand_while_loading_returns_null() {
        let mut web = make_session();
        let ticket = web.start("Creativity");
        assert_eq!(web.expand("root"), "null");

        let outcome = parse(&web.complete(&ticket, r#"{"words": ["Art"]}"#));
        assert_eq!(outcome["kind"], "expanded");
        let ticket = parse(&web.expand("root-0"));
        assert_eq!(ticket["node_id"], "root-0");
        assert_eq!(ticket["existing_words"], serde_json::json!(["Creativity", "Art"]));
    }

    #[test]
    fn test_fail_and_stale_tickets() {
        let mut web = make_session();
        let ticket = web.start("Creativity");
        let outcome = parse(&web.fail(&ticket, "timeout"));
        assert_eq!(outcome["kind"], "failed");
        assert_eq!(outcome["message"], "timeout");

        let ticket = web.expand("root");
        web.reset();
        let outcome = parse(&web.complete(&ticket, r#"{"words": ["Art"]}"#));
        assert_eq!(outcome["kind"], "stale");
        assert_eq!(parse(&web.render()), serde_json::json!({ "map_size": 4000.0 }));
    }

    #[test]
    fn test_partial_config() {
        let web = WordWeb::new(r#"{ "map_size": 1000 }"#);
        assert_eq!(parse(&web.render())["map_size"], 1000.0);
    }

    #[test]
    fn test_prompt_and_schema_exports() {
        let prompt = related_words_prompt("Ocean", r#"["Ocean", "Wave"]"#);
        assert!(prompt.contains("Ocean"));
        assert!(prompt.contains("Wave"));

        let schema = parse(&related_words_schema());
        assert_eq!(schema, expansion::related_words_schema());
    }
}
