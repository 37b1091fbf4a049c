//! # tablemind-ai: decision providers
//!
//! Implementations of [`DecisionProvider`] that can sit at a table:
//!
//! - [`chat`] - OpenAI-compatible chat endpoint (local Ollama by default)
//! - [`baseline`] - Rule-based player for offline games
//! - [`scripted`] - Canned replies, mostly for tests and demos
//! - [`prompt`] - Prompt templates shared by every chat player
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use tablemind_ai::{create_provider, chat::ChatSettings, prompt::PromptTemplates};
//!
//! let templates = Arc::new(PromptTemplates::default());
//! let bot = create_provider("baseline", &templates, &ChatSettings::default()).unwrap();
//! assert_eq!(bot.name(), "baseline");
//! ```

use std::sync::Arc;

use tablemind_engine::decision::{DecisionProvider, ProviderError};

pub mod baseline;
pub mod chat;
pub mod prompt;
pub mod scripted;

use chat::{ChatProvider, ChatSettings};
use prompt::PromptTemplates;

/// Model id of the built-in rule-based player.
pub const BASELINE: &str = "baseline";
/// Prefix of a scripted model id, e.g. `scripted:raise 40,call,fold`.
pub const SCRIPTED_PREFIX: &str = "scripted:";

/// Builds the provider for a model id.
///
/// `baseline` and `scripted:...` are handled locally; any other id is sent
/// to the chat endpoint as the model name.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use tablemind_ai::{create_provider, chat::ChatSettings, prompt::PromptTemplates};
///
/// let templates = Arc::new(PromptTemplates::default());
/// let bot = create_provider("scripted:call,fold", &templates, &ChatSettings::default()).unwrap();
/// assert_eq!(bot.name(), "scripted");
/// ```
pub fn create_provider(
    model: &str,
    templates: &Arc<PromptTemplates>,
    settings: &ChatSettings,
) -> Result<Box<dyn DecisionProvider>, ProviderError> {
    if model == BASELINE {
        return Ok(Box::new(baseline::BaselineProvider::new()));
    }
    if let Some(script) = model.strip_prefix(SCRIPTED_PREFIX) {
        return Ok(Box::new(scripted::ScriptedProvider::from_script(script)));
    }
    let chat = ChatProvider::new(model, Arc::clone(templates), settings.clone())?;
    Ok(Box::new(chat))
}
