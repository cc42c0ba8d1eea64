//! Builds the conversation a command sends.

use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use pixelcode_llms::{ContentPart, Conversation};

use crate::cli::InputArgs;

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are an expert Tailwind developer.
You take screenshots of a reference web page from the user, and then build single page apps using Tailwind, HTML and JS.

- Make sure the app looks exactly like the screenshot.
- Use the exact text from the screenshot.
- Do not add comments in place of full code. WRITE THE FULL CODE.
- For images, use placeholder images from https://placehold.co with a detailed alt text.

Return only the full code in <html></html> tags.
Do not include markdown \"```\" or \"```html\" at the start or end.";

/// Conversation from `--conversation`, or from `--prompt` plus optional system prompt and image.
pub fn load_conversation(input: &InputArgs) -> Result<Conversation> {
    if let Some(path) = &input.conversation {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read conversation file {}", path.display()))?;
        return serde_json::from_str(&raw)
            .with_context(|| format!("invalid conversation in {}", path.display()));
    }

    let prompt = input
        .prompt
        .as_deref()
        .ok_or_else(|| anyhow!("either --conversation or --prompt is required"))?;
    let system = input.system.as_deref().unwrap_or(DEFAULT_SYSTEM_PROMPT);

    let conversation = match &input.image {
        Some(image) => Conversation::new(system).with_user(vec![
            ContentPart::image(image_url(image)?),
            ContentPart::text(prompt),
        ]),
        None => Conversation::new(system).with_user(prompt),
    };
    Ok(conversation)
}

/// URLs pass through; local files become base64 data URLs.
pub fn image_url(source: &str) -> Result<String> {
    if ["http://", "https://", "data:"]
        .iter()
        .any(|scheme| source.starts_with(scheme))
    {
        return Ok(source.to_string());
    }

    let path = Path::new(source);
    let media_type = media_type(path)?;
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read image {}", path.display()))?;
    Ok(format!("data:{};base64,{}", media_type, STANDARD.encode(bytes)))
}

fn media_type(path: &Path) -> Result<&'static str> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    Ok(match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => bail!(
            "unsupported image type for {} (expected png, jpeg, gif or webp)",
            path.display()
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixelcode_llms::{Content, Role};
    use std::io::Write;

    fn args() -> InputArgs {
        InputArgs {
            conversation: None,
            prompt: None,
            system: None,
            image: None,
        }
    }

    #[test]
    fn test_urls_pass_through() {
        assert_eq!(
            image_url("https://example.com/a.png").unwrap(),
            "https://example.com/a.png"
        );
        assert_eq!(
            image_url("data:image/png;base64,AAA").unwrap(),
            "data:image/png;base64,AAA"
        );
    }

    #[test]
    fn test_local_file_becomes_data_url() {
        let mut file = tempfile::Builder::new().suffix(".PNG").tempfile().unwrap();
        file.write_all(b"png!").unwrap();
        let url = image_url(file.path().to_str().unwrap()).unwrap();
        assert_eq!(url, format!("data:image/png;base64,{}", STANDARD.encode(b"png!")));
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let file = tempfile::Builder::new().suffix(".bmp").tempfile().unwrap();
        assert!(image_url(file.path().to_str().unwrap()).is_err());
    }

    #[test]
    fn test_prompt_only_conversation() {
        let mut input = args();
        input.prompt = Some("a pricing page".into());
        let conversation = load_conversation(&input).unwrap();
        assert_eq!(conversation.len(), 2);
        assert_eq!(conversation.system_prompt(), DEFAULT_SYSTEM_PROMPT);
        assert_eq!(conversation.last().content, Content::from("a pricing page"));
    }

    #[test]
    fn test_image_comes_before_text() {
        let mut input = args();
        input.prompt = Some("Generate code for this screenshot".into());
        input.system = Some("sys".into());
        input.image = Some("https://example.com/shot.png".into());
        let conversation = load_conversation(&input).unwrap();
        let last = conversation.last();
        assert_eq!(last.role, Role::User);
        assert_eq!(
            last.content,
            Content::from(vec![
                ContentPart::image("https://example.com/shot.png"),
                ContentPart::text("Generate code for this screenshot"),
            ])
        );
    }

    #[test]
    fn test_conversation_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"role":"system","content":"sys"}},{{"role":"user","content":"hi"}}]"#
        )
        .unwrap();
        let mut input = args();
        input.conversation = Some(file.path().to_path_buf());
        let conversation = load_conversation(&input).unwrap();
        assert_eq!(conversation.system_prompt(), "sys");
        assert_eq!(conversation.len(), 2);
    }

    #[test]
    fn test_conversation_without_system_turn_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"role":"user","content":"hi"}}]"#).unwrap();
        let mut input = args();
        input.conversation = Some(file.path().to_path_buf());
        assert!(load_conversation(&input).is_err());
    }

    #[test]
    fn test_missing_prompt() {
        assert!(load_conversation(&args()).is_err());
    }
}
