// English detection and translation
//
// A single input flows through four stages:
// - input guard: blank text short-circuits
// - mode selection: demo (local heuristic only) or live (model backed)
// - model invocation: one chat call, failures become "no answer"
// - reply interpretation: structured JSON verdict, then heuristic + plain translation

pub mod client;
pub mod parse;

use std::sync::Arc;
use std::time::Duration;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

pub use client::{ChatClient, OllamaClient, check_availability};
pub use parse::{Verdict, looks_non_english};
use crate::config::TranslatorConfig;
use crate::error::Result;

/// Placeholder returned for non-ASCII input in demo mode
pub const DEMO_TRANSLATION: &str = "This is a demo translation";

/// Prompt asking for a strict JSON verdict; the input is appended
pub const IDENTIFY_PROMPT: &str = r#"You are a translator and language identifier.
Return ONLY JSON exactly like: {"is_english": true|false, "translated_content": "<string>"}
- If input is English: is_english=true and translated_content equals the original input.
- If input is not English: is_english=false and translated_content is the English translation.
No extra text, no code fences.

Input: "#;

/// Prompt asking for a plain translation; the input is appended
pub const TRANSLATE_ONLY_PROMPT: &str = "Translate the following text into natural English.
Only output the translation, no explanations, no code fences:

";

/// Outcome of a translation: either the original English text or an English rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationResult {
    pub is_english: bool,
    #[serde(rename = "translated_content")]
    pub text: String,
}

impl TranslationResult {
    pub fn english(text: impl Into<String>) -> Self {
        Self { is_english: true, text: text.into() }
    }

    pub fn translated(text: impl Into<String>) -> Self {
        Self { is_english: false, text: text.into() }
    }

    pub fn into_pair(self) -> (bool, String) {
        (self.is_english, self.text)
    }
}

/// Translation orchestrator
pub struct Translator {
    config: TranslatorConfig,
    client: Option<Arc<dyn ChatClient>>,
}

impl Translator {
    /// Create a translator talking to ollama; a client that cannot be built is treated as absent
    pub fn new(config: TranslatorConfig) -> Self {
        let client = match OllamaClient::new(&config.endpoint, Duration::from_secs(config.timeout_secs)) {
            Ok(client) => Some(Arc::new(client) as Arc<dyn ChatClient>),
            Err(e) => {
                warn!("Failed to create ollama client, continuing without a model: {}", e);
                None
            }
        };

        Self { config, client }
    }

    /// Create a translator with an explicit chat capability (or none)
    pub fn with_client(config: TranslatorConfig, client: Option<Arc<dyn ChatClient>>) -> Self {
        Self { config, client }
    }

    pub fn is_demo(&self) -> bool {
        self.config.demo_mode
    }

    pub fn config(&self) -> &TranslatorConfig {
        &self.config
    }

    /// Check that the configured model is served by the configured endpoint
    pub async fn check_model(&self) -> Result<()> {
        check_availability(&self.config.endpoint, &self.config.model).await
    }

    /// Decide whether `content` is English and translate it if it is not.
    ///
    /// Never fails: every model problem degrades to a fallback, and the last
    /// resort reports the input as English, unchanged.
    pub async fn translate(&self, content: &str) -> TranslationResult {
        if content.trim().is_empty() {
            return TranslationResult::english("");
        }

        if self.config.demo_mode {
            return Self::translate_demo(content);
        }

        self.translate_live(content).await
    }

    fn translate_demo(text: &str) -> TranslationResult {
        if looks_non_english(text) {
            debug!("Demo mode: non-ASCII input, returning placeholder");
            TranslationResult::translated(DEMO_TRANSLATION)
        } else {
            TranslationResult::english(text)
        }
    }

    async fn translate_live(&self, text: &str) -> TranslationResult {
        if let Some(raw) = self.ask_model(&format!("{}{}", IDENTIFY_PROMPT, text)).await {
            match parse::interpret(&raw) {
                Some(verdict) => return Self::resolve_verdict(verdict, text),
                None => warn!("Unparsable verdict from model, falling back to heuristic"),
            }
        }

        if !looks_non_english(text) {
            info!("No verdict from model, input looks English");
            return TranslationResult::english(text);
        }

        info!("No verdict from model, input looks non-English; requesting plain translation");
        let reply = self
            .ask_model(&format!("{}{}", TRANSLATE_ONLY_PROMPT, text))
            .await
            .map(|raw| parse::strip_fences(&raw))
            .filter(|out| !out.is_empty());

        match reply {
            Some(out) => TranslationResult::translated(out),
            // No translation obtainable: report the original as English rather than invent one
            None => {
                warn!("Plain translation unavailable, returning original text");
                TranslationResult::english(text)
            }
        }
    }

    fn resolve_verdict(verdict: Verdict, text: &str) -> TranslationResult {
        if verdict.is_english {
            return TranslationResult::english(text);
        }

        let translated = verdict.translated_content.trim();
        if translated.is_empty() {
            TranslationResult::translated(text)
        } else {
            TranslationResult::translated(translated)
        }
    }

    /// One model call; `None` on absence, failure or an empty reply
    async fn ask_model(&self, prompt: &str) -> Option<String> {
        let Some(client) = &self.client else {
            debug!("No chat client available");
            return None;
        };

        debug!("Prompt: {}", prompt);

        match client.chat(&self.config.model, prompt).await {
            Ok(reply) => {
                let reply = reply.trim();
                debug!("Raw model reply: {}", reply);
                (!reply.is_empty()).then(|| reply.to_string())
            }
            Err(e) => {
                warn!("Model call failed: {}", e);
                None
            }
        }
    }
}
