//! Replays a fixed list of replies.

use std::collections::VecDeque;
use std::sync::Mutex;

use tablemind_engine::decision::{ActionContext, DecisionProvider, ProviderError, ReflectContext};

/// Answers decisions from a queue. Once the queue is empty every decision
/// fails with [`ProviderError::Exhausted`]. Reflections keep the previous
/// opinion.
#[derive(Debug)]
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<String>>,
}

impl ScriptedProvider {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
        }
    }

    /// Comma-separated replies, e.g. `raise 40,call,fold`.
    pub fn from_script(script: &str) -> Self {
        Self::new(
            script
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty()),
        )
    }

    pub fn remaining(&self) -> usize {
        self.replies
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}

impl DecisionProvider for ScriptedProvider {
    fn decide(&self, _ctx: &ActionContext<'_>) -> Result<String, ProviderError> {
        self.replies
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front()
            .ok_or(ProviderError::Exhausted)
    }

    fn reflect(&self, ctx: &ReflectContext<'_>) -> Result<String, ProviderError> {
        Ok(ctx.previous_opinion.to_string())
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
