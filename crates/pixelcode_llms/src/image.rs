//! Data-URL handling shared by the provider converters.

use crate::error::{Error, Result};

/// Decoded parts of a `data:<media_type>;base64,<data>` URL. The payload stays base64.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataUrl<'a> {
    pub media_type: &'a str,
    pub data: &'a str,
}

/// Where an image part points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource<'a> {
    Embedded(DataUrl<'a>),
    Remote(&'a str),
}

impl<'a> ImageSource<'a> {
    /// Classify a URL. Anything starting with `data:` must be a well-formed base64 data URL.
    pub fn parse(url: &'a str) -> Result<Self> {
        if url.trim_start().starts_with("data:") {
            parse_data_url(url).map(ImageSource::Embedded)
        } else {
            Ok(ImageSource::Remote(url))
        }
    }
}

/// Split a base64 data URL into media type and payload.
///
/// Fails with [`Error::InvalidImage`] when `url` is not an embedded base64 data URL.
pub fn parse_data_url(url: &str) -> Result<DataUrl<'_>> {
    let url = url.trim();
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| Error::InvalidImage(format!("not a data URL: {}", preview(url))))?;

    let (header, data) = rest
        .split_once(',')
        .ok_or_else(|| Error::InvalidImage("data URL has no payload separator".to_string()))?;

    let media_type = header
        .strip_suffix(";base64")
        .ok_or_else(|| Error::InvalidImage("data URL is not base64-encoded".to_string()))?;

    if !media_type.contains('/') {
        return Err(Error::InvalidImage(format!(
            "data URL has no valid media type: '{}'",
            media_type
        )));
    }
    if data.is_empty() {
        return Err(Error::InvalidImage("data URL payload is empty".to_string()));
    }

    Ok(DataUrl { media_type, data })
}

fn preview(url: &str) -> String {
    let mut head: String = url.chars().take(40).collect();
    if url.chars().count() > 40 {
        head.push_str("...");
    }
    head
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_jpeg_data_url() {
        let parsed = parse_data_url("data:image/jpeg;base64,AAA").unwrap();
        assert_eq!(parsed.media_type, "image/jpeg");
        assert_eq!(parsed.data, "AAA");
    }

    #[test]
    fn test_non_data_url_is_invalid_image() {
        let err = parse_data_url("invalid_data").unwrap_err();
        assert!(matches!(err, Error::InvalidImage(_)));

        let err = parse_data_url("https://example.com/shot.png").unwrap_err();
        assert!(matches!(err, Error::InvalidImage(_)));
    }

    #[test]
    fn test_rejects_non_base64_and_empty_payloads() {
        assert!(parse_data_url("data:text/plain,hello").is_err());
        assert!(parse_data_url("data:image/png;base64,").is_err());
        assert!(parse_data_url("data:;base64,AAA").is_err());
        assert!(parse_data_url("data:image/png;base64").is_err());
    }

    #[test]
    fn test_image_source_classification() {
        assert_eq!(
            ImageSource::parse("https://example.com/a.png").unwrap(),
            ImageSource::Remote("https://example.com/a.png")
        );
        assert!(matches!(
            ImageSource::parse("data:image/png;base64,iVBOR").unwrap(),
            ImageSource::Embedded(DataUrl {
                media_type: "image/png",
                ..
            })
        ));
        assert!(ImageSource::parse("data:broken").is_err());
    }
}
