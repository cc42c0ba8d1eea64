//! Provider-neutral conversation model.
//!
//! The serialized form is the OpenAI chat-message schema:
//!
//! ```json
//! [
//!   {"role": "system", "content": "You are..."},
//!   {"role": "user", "content": [
//!     {"type": "image_url", "image_url": {"url": "data:image/png;base64,..."}},
//!     {"type": "text", "text": "Generate code for this screenshot"}
//!   ]}
//! ]
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// Image reference: a plain URL or a `data:<mime>;base64,<payload>` URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// One part of a multi-part message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Text { text: text.into() }
    }

    pub fn image(url: impl Into<String>) -> Self {
        ContentPart::ImageUrl {
            image_url: ImageUrl {
                url: url.into(),
                detail: None,
            },
        }
    }
}

/// Message content: plain text or an ordered list of parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Content {
    Text(String),
    Parts(Vec<ContentPart>),
}

impl Content {
    /// Text parts in order. Plain text content yields itself.
    pub fn text_parts(&self) -> Vec<&str> {
        match self {
            Content::Text(text) => vec![text.as_str()],
            Content::Parts(parts) => parts
                .iter()
                .filter_map(|p| match p {
                    ContentPart::Text { text } => Some(text.as_str()),
                    ContentPart::ImageUrl { .. } => None,
                })
                .collect(),
        }
    }

    /// Text parts joined with `separator`, skipping empty ones.
    pub fn joined_text(&self, separator: &str) -> String {
        self.text_parts()
            .into_iter()
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(separator)
    }

    pub fn images(&self) -> impl Iterator<Item = &ImageUrl> {
        let parts: &[ContentPart] = match self {
            Content::Text(_) => &[],
            Content::Parts(parts) => parts,
        };
        parts.iter().filter_map(|p| match p {
            ContentPart::ImageUrl { image_url } => Some(image_url),
            ContentPart::Text { .. } => None,
        })
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Content::Text(text)
    }
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Content::Text(text.to_string())
    }
}

impl From<Vec<ContentPart>> for Content {
    fn from(parts: Vec<ContentPart>) -> Self {
        Content::Parts(parts)
    }
}

/// A single conversation turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: Content,
}

impl Turn {
    pub fn new(role: Role, content: impl Into<Content>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<Content>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<Content>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<Content>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// System prompt followed by user/assistant turns.
///
/// Turn 0 is always the system prompt and no other turn has the system role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Turn>", into = "Vec<Turn>")]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            turns: vec![Turn::system(system_prompt.into())],
        }
    }

    /// Build from raw turns, checking the system-prompt layout.
    pub fn from_turns(turns: Vec<Turn>) -> Result<Self> {
        let Some(first) = turns.first() else {
            return Err(Error::invalid_input("conversation has no turns"));
        };
        if first.role != Role::System {
            return Err(Error::invalid_input(format!(
                "turn 0 must be the system prompt, got role '{}'",
                first.role.as_str()
            )));
        }
        if let Some(index) = turns.iter().skip(1).position(|t| t.role == Role::System) {
            return Err(Error::invalid_input(format!(
                "unexpected system turn at index {}",
                index + 1
            )));
        }
        Ok(Self { turns })
    }

    pub fn with_user(mut self, content: impl Into<Content>) -> Self {
        self.push_user(content);
        self
    }

    pub fn with_assistant(mut self, content: impl Into<Content>) -> Self {
        self.push_assistant(content);
        self
    }

    pub fn push_user(&mut self, content: impl Into<Content>) {
        self.turns.push(Turn::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<Content>) {
        self.turns.push(Turn::assistant(content));
    }

    /// Text of the system prompt.
    pub fn system_prompt(&self) -> String {
        self.turns[0].content.joined_text("\n")
    }

    /// All turns, system prompt included.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Turns after the system prompt.
    pub fn messages(&self) -> &[Turn] {
        &self.turns[1..]
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Always false; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> &Turn {
        &self.turns[self.turns.len() - 1]
    }

    /// Number of image parts across all turns.
    pub fn image_count(&self) -> usize {
        self.turns.iter().map(|t| t.content.images().count()).sum()
    }
}

impl TryFrom<Vec<Turn>> for Conversation {
    type Error = Error;

    fn try_from(turns: Vec<Turn>) -> Result<Self> {
        Self::from_turns(turns)
    }
}

impl From<Conversation> for Vec<Turn> {
    fn from(conversation: Conversation) -> Self {
        conversation.turns
    }
}
