//! Conversion from the neutral conversation to Anthropic requests

use super::types::{
    AnthropicBlock, AnthropicContent, AnthropicImageSource, AnthropicMessage, AnthropicRequest,
};
use crate::error::Result;
use crate::image::parse_data_url;
use crate::model::Model;
use crate::types::{Content, ContentPart, Conversation, Role};

/// Build a streaming request. The system turn becomes the `system` field and every image
/// part must be an embedded data URL. `prefill` is sent as a trailing assistant turn.
pub fn to_anthropic_request(
    conversation: &Conversation,
    model: Model,
    max_tokens: u32,
    prefill: Option<&str>,
) -> Result<AnthropicRequest> {
    let mut messages = conversation
        .messages()
        .iter()
        .map(|turn| {
            Ok(AnthropicMessage {
                role: role(turn.role),
                content: to_anthropic_content(&turn.content)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    if let Some(prefill) = prefill {
        messages.push(AnthropicMessage {
            role: "assistant",
            content: AnthropicContent::Text(prefill.to_string()),
        });
    }

    Ok(AnthropicRequest {
        model: model.as_str(),
        system: conversation.system_prompt(),
        messages,
        max_tokens,
        temperature: model.params().temperature,
        stream: true,
    })
}

fn role(role: Role) -> &'static str {
    match role {
        Role::Assistant => "assistant",
        Role::User | Role::System => "user",
    }
}

fn to_anthropic_content(content: &Content) -> Result<AnthropicContent> {
    match content {
        Content::Text(text) => Ok(AnthropicContent::Text(text.clone())),
        Content::Parts(parts) => parts
            .iter()
            .map(to_anthropic_block)
            .collect::<Result<Vec<_>>>()
            .map(AnthropicContent::Blocks),
    }
}

fn to_anthropic_block(part: &ContentPart) -> Result<AnthropicBlock> {
    match part {
        ContentPart::Text { text } => Ok(AnthropicBlock::Text { text: text.clone() }),
        ContentPart::ImageUrl { image_url } => {
            let image = parse_data_url(&image_url.url)?;
            Ok(AnthropicBlock::Image {
                source: AnthropicImageSource {
                    kind: "base64",
                    media_type: image.media_type.to_string(),
                    data: image.data.to_string(),
                },
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use serde_json::json;

    #[test]
    fn test_system_prompt_and_image_rewrite() {
        let conv = Conversation::new("Be precise").with_user(vec![
            ContentPart::image("data:image/jpeg;base64,AAA"),
            ContentPart::text("Make it"),
        ]);
        let request = to_anthropic_request(&conv, Model::Claude3Opus, 8192, None).unwrap();
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["system"], "Be precise");
        assert_eq!(value["max_tokens"], 8192);
        assert_eq!(value["temperature"], 0.0);
        assert_eq!(value["stream"], true);
        assert_eq!(value["messages"].as_array().unwrap().len(), 1);
        assert_eq!(
            value["messages"][0]["content"][0],
            json!({"type": "image", "source": {"type": "base64", "media_type": "image/jpeg", "data": "AAA"}})
        );
        assert_eq!(
            value["messages"][0]["content"][1],
            json!({"type": "text", "text": "Make it"})
        );
    }

    #[test]
    fn test_caller_conversation_untouched() {
        let conv = Conversation::new("s").with_user(vec![ContentPart::image(
            "data:image/png;base64,QQ==",
        )]);
        let before = conv.clone();
        to_anthropic_request(&conv, Model::Claude3Haiku, 8192, None).unwrap();
        assert_eq!(conv, before);
    }

    #[test]
    fn test_remote_image_is_rejected() {
        let conv = Conversation::new("s")
            .with_user(vec![ContentPart::image("https://example.com/shot.png")]);
        let err = to_anthropic_request(&conv, Model::Claude3Haiku, 8192, None).unwrap_err();
        assert!(matches!(err, Error::InvalidImage(_)));
    }

    #[test]
    fn test_prefill_appends_assistant_turn() {
        let conv = Conversation::new("s").with_user("hi");
        let request =
            to_anthropic_request(&conv, Model::Claude35Sonnet20241022, 4096, Some("<thinking>"))
                .unwrap();
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[1].role, "assistant");
        assert_eq!(
            request.messages[1].content,
            AnthropicContent::Text("<thinking>".to_string())
        );
    }
}
