//! Conversion from the neutral conversation to a Gemini request

use super::types::{GeminiContent, GeminiGenerationConfig, GeminiPart, GeminiRequest};
use crate::error::Result;
use crate::image::ImageSource;
use crate::model::Model;
use crate::types::Conversation;

const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 8192;

/// One content holding the system prompt and the first image of the last turn.
pub fn to_gemini_request(conversation: &Conversation, model: Model) -> Result<GeminiRequest> {
    let params = model.params();
    let mut parts = vec![GeminiPart::Text(conversation.system_prompt())];

    if let Some(image) = conversation.last().content.images().next() {
        let part = match ImageSource::parse(&image.url)? {
            ImageSource::Embedded(data_url) => GeminiPart::InlineData {
                mime_type: data_url.media_type.to_string(),
                data: data_url.data.to_string(),
            },
            ImageSource::Remote(uri) => GeminiPart::FileData {
                file_uri: uri.to_string(),
            },
        };
        parts.push(part);
    }

    Ok(GeminiRequest {
        contents: vec![GeminiContent {
            role: "user",
            parts,
        }],
        generation_config: GeminiGenerationConfig {
            temperature: params.temperature.unwrap_or(0.0),
            max_output_tokens: params
                .token_limit
                .map_or(DEFAULT_MAX_OUTPUT_TOKENS, |limit| limit.value),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ContentPart;
    use serde_json::json;

    #[test]
    fn test_inline_image_and_config() {
        let conv = Conversation::new("Generate HTML").with_user(vec![
            ContentPart::image("data:image/png;base64,iVBOR"),
            ContentPart::image("data:image/png;base64,SECOND"),
        ]);
        let value =
            serde_json::to_value(to_gemini_request(&conv, Model::Gemini20FlashExp).unwrap())
                .unwrap();
        assert_eq!(
            value["contents"][0]["parts"],
            json!([
                {"text": "Generate HTML"},
                {"inline_data": {"mime_type": "image/png", "data": "iVBOR"}}
            ])
        );
        assert_eq!(value["generationConfig"]["temperature"], 0.0);
        assert_eq!(value["generationConfig"]["maxOutputTokens"], 8192);
    }

    #[test]
    fn test_remote_image_becomes_file_data() {
        let conv = Conversation::new("s")
            .with_user(vec![ContentPart::image("https://example.com/a.png")]);
        let request = to_gemini_request(&conv, Model::Gemini20FlashExp).unwrap();
        assert_eq!(
            request.contents[0].parts[1],
            GeminiPart::FileData {
                file_uri: "https://example.com/a.png".to_string()
            }
        );
    }

    #[test]
    fn test_text_only_conversation() {
        let conv = Conversation::new("s").with_user("no image");
        let request = to_gemini_request(&conv, Model::Gemini20FlashExp).unwrap();
        assert_eq!(request.contents[0].parts, vec![GeminiPart::Text("s".into())]);
    }
}
