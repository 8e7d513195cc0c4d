//! Conversation turns and the per-session conversation log.
//!
//! A user asks a question → the agent loop answers → both sides are appended
//! here and replayed as history on the next question.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a conversation (session).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationId(pub String);

impl ConversationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Default for ConversationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The person asking about a claim
    User,
    /// The fact-checking assistant
    Assistant,
}

/// A single turn in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl ConversationTurn {
    /// Create a new user turn.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create a new assistant turn.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Ordered, append-only log of turns for one session.
///
/// Turns can only be appended. The single exception is
/// [`Conversation::discard_unanswered`], which drops a trailing user turn
/// whose answer never arrived, so the log only ever holds completed
/// exchanges plus at most one pending question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: ConversationId,
    turns: Vec<ConversationTurn>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Create a new empty conversation.
    pub fn new() -> Self {
        Self::with_id(ConversationId::new())
    }

    /// Create an empty conversation with a caller-chosen id.
    pub fn with_id(id: ConversationId) -> Self {
        let now = Utc::now();
        Self {
            id,
            turns: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Append a turn.
    pub fn push(&mut self, turn: ConversationTurn) {
        self.updated_at = Utc::now();
        self.turns.push(turn);
    }

    /// All turns in submission order.
    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// The most recent turn, if any.
    pub fn last(&self) -> Option<&ConversationTurn> {
        self.turns.last()
    }

    /// Drop the trailing user turn if it never got an answer.
    ///
    /// Returns the discarded turn. Assistant turns are never removed.
    pub fn discard_unanswered(&mut self) -> Option<ConversationTurn> {
        match self.turns.last() {
            Some(turn) if turn.role == Role::User => {
                self.updated_at = Utc::now();
                self.turns.pop()
            }
            _ => None,
        }
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}
