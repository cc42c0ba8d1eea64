//! Flattening of the neutral conversation into DeepSeek's text-only messages

use super::types::{DeepSeekMessage, DeepSeekRequest};
use crate::model::Model;
use crate::types::{Conversation, Role};

const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Build the request. Images cannot be sent and are dropped with a warning.
pub fn to_deepseek_request(conversation: &Conversation, model: Model) -> DeepSeekRequest {
    let params = model.params();
    let dropped = conversation.image_count();
    if dropped > 0 {
        tracing::warn!(
            images = dropped,
            "deepseek accepts text only, dropping image parts"
        );
    }

    DeepSeekRequest {
        model: model.as_str(),
        messages: flatten(conversation),
        max_tokens: params
            .token_limit
            .map_or(DEFAULT_MAX_TOKENS, |limit| limit.value),
        temperature: params.temperature.unwrap_or(0.0),
        stream: true,
    }
}

/// Text parts joined by newlines. Turns left empty are dropped, except the system turn.
pub fn flatten(conversation: &Conversation) -> Vec<DeepSeekMessage> {
    conversation
        .turns()
        .iter()
        .filter_map(|turn| {
            let content = turn.content.joined_text("\n");
            if content.is_empty() && turn.role != Role::System {
                return None;
            }
            Some(DeepSeekMessage {
                role: turn.role.as_str(),
                content,
            })
        })
        .collect()
}
