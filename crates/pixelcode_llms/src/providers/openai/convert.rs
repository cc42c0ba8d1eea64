//! Conversion between the neutral conversation and OpenAI requests/responses

use super::types::{OpenAIRequest, OpenAIResponse};
use crate::error::{Error, Result};
use crate::model::{Model, TokenLimitField};
use crate::types::{Conversation, Usage};

/// Build the request for `model`. The conversation is sent verbatim.
pub fn to_openai_request(conversation: &Conversation, model: Model) -> OpenAIRequest<'_> {
    let params = model.params();
    let limit = params.token_limit;

    OpenAIRequest {
        model: model.as_str(),
        messages: conversation.turns(),
        temperature: params.temperature,
        max_tokens: limit
            .filter(|l| l.field == TokenLimitField::MaxTokens)
            .map(|l| l.value),
        max_completion_tokens: limit
            .filter(|l| l.field == TokenLimitField::MaxCompletionTokens)
            .map(|l| l.value),
        stream: params.supports_streaming.then_some(true),
    }
}

/// Text of the single returned message.
pub fn from_openai_response(response: OpenAIResponse) -> Result<(String, Option<Usage>)> {
    let usage = response
        .usage
        .map(|u| Usage::new(u.prompt_tokens, u.completion_tokens));
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| Error::invalid_response("OpenAI response has no choices"))?;
    let text = choice
        .message
        .content
        .ok_or_else(|| Error::invalid_response("OpenAI response message has no content"))?;
    Ok((text, usage))
}
