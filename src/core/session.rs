//! Chat session controller.
//!
//! Mediates exactly one outstanding query at a time and keeps the transcript
//! consistent with request outcomes. Send is a two-step protocol: the
//! controller hands back a fully-built wire request tagged with a generation
//! number, and the caller later resolves that generation with an outcome.
//! Outcomes carrying a stale generation are discarded.

use std::collections::VecDeque;

use crate::api::{ModelSettings, QueryRequest, WireMessage};
use crate::core::knowledge::StackRegistry;
use crate::core::message::Message;
use crate::core::transport::QueryOutcome;
use crate::utils::direction::{detect_direction, TextDirection};
use crate::utils::logging::LoggingState;

/// Greeting seeded into every new session. It participates in the history
/// sent to the backend like any other assistant message.
pub const GREETING: &str = "Hello! I'm Edris. How can I help you today?";

/// Transport failures are swallowed into the conversation as this apology
/// rather than surfaced through a separate error channel.
pub const SEND_FAILED_FALLBACK: &str = "Sorry, I encountered an error. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendPhase {
    Idle,
    Pending,
}

/// Mode tags forwarded verbatim to the backend. Opaque to the client beyond
/// their names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeTag {
    Think,
    Explore,
}

impl ModeTag {
    pub fn as_str(self) -> &'static str {
        match self {
            ModeTag::Think => "think",
            ModeTag::Explore => "explore",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "think" => Some(ModeTag::Think),
            "explore" => Some(ModeTag::Explore),
            _ => None,
        }
    }
}

pub struct ChatSession {
    messages: VecDeque<Message>,
    phase: SendPhase,
    generation: u64,
    modes: Vec<ModeTag>,
    direction: TextDirection,
    pub model_settings: ModelSettings,
    pub stacks: StackRegistry,
    pub logging: LoggingState,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    pub fn new() -> Self {
        let mut messages = VecDeque::new();
        messages.push_back(Message::assistant(GREETING));

        ChatSession {
            messages,
            phase: SendPhase::Idle,
            generation: 0,
            modes: Vec::new(),
            direction: TextDirection::Ltr,
            model_settings: ModelSettings::default(),
            stacks: StackRegistry::new(),
            logging: LoggingState::new(None),
        }
    }

    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    pub fn phase(&self) -> SendPhase {
        self.phase
    }

    pub fn is_pending(&self) -> bool {
        self.phase == SendPhase::Pending
    }

    /// Session-level direction, driving input-box alignment. Individual
    /// message bubbles classify themselves independently.
    pub fn direction(&self) -> TextDirection {
        self.direction
    }

    pub fn set_direction(&mut self, direction: TextDirection) {
        self.direction = direction;
    }

    pub fn toggle_direction(&mut self) -> TextDirection {
        self.direction = self.direction.toggled();
        self.direction
    }

    /// Toggle a mode tag; returns whether it is active afterwards.
    pub fn toggle_mode(&mut self, mode: ModeTag) -> bool {
        if let Some(pos) = self.modes.iter().position(|m| *m == mode) {
            self.modes.remove(pos);
            false
        } else {
            self.modes.push(mode);
            true
        }
    }

    pub fn active_modes(&self) -> Vec<String> {
        self.modes.iter().map(|m| m.as_str().to_string()).collect()
    }

    /// Append a transcript-only notice (command feedback, status). Never
    /// transmitted to the backend.
    pub fn add_notice(&mut self, content: impl Into<String>) {
        self.messages.push_back(Message::notice(content));
    }

    /// Start a send. Returns `None` without touching any state when a query
    /// is already pending or the input trims to nothing; otherwise appends
    /// the user message and returns the wire request with its generation.
    pub fn begin_send(&mut self, input: &str) -> Option<(QueryRequest, u64)> {
        if self.phase == SendPhase::Pending {
            return None;
        }

        let prompt = input.trim();
        if prompt.is_empty() {
            return None;
        }

        self.direction = detect_direction(prompt);

        if let Err(e) = self.logging.log_message(&format!("You: {prompt}")) {
            tracing::warn!(error = %e, "failed to log user message");
        }
        self.messages.push_back(Message::user(prompt));

        let history = self
            .messages
            .iter()
            .filter_map(|m| {
                m.role.to_api_role().map(|role| WireMessage {
                    role: role.to_string(),
                    content: m.content.clone(),
                })
            })
            .collect();

        self.phase = SendPhase::Pending;
        self.generation += 1;

        let request = QueryRequest {
            prompt: prompt.to_string(),
            kind: "text".to_string(),
            history,
            modes: self.active_modes(),
            model_settings: self.model_settings,
            knowledge_stacks: self.stacks.active_ids(),
        };

        Some((request, self.generation))
    }

    /// Merge a query outcome into the transcript. Outcomes for any
    /// generation other than the pending one are dropped; with single-flight
    /// sends that only happens for responses arriving after teardown.
    pub fn resolve(&mut self, generation: u64, outcome: QueryOutcome) {
        if self.phase != SendPhase::Pending || generation != self.generation {
            tracing::debug!(generation, "discarding stale query outcome");
            return;
        }

        let content = match outcome {
            QueryOutcome::Response(text) => text,
            QueryOutcome::Failed => SEND_FAILED_FALLBACK.to_string(),
        };

        if let Err(e) = self.logging.log_message(&content) {
            tracing::warn!(error = %e, "failed to log assistant message");
        }
        self.messages.push_back(Message::assistant(content));
        self.phase = SendPhase::Idle;
    }
}
