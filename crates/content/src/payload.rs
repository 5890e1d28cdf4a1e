//! Wire format of the photo listing.

use anchorwall_core::content::ContentItem;
use anchorwall_core::error::SourceError;
use serde::Deserialize;

/// `{"photos": [...]}` as served by the gallery backend, or a bare array.
#[derive(Deserialize)]
#[serde(untagged)]
enum Payload {
    Wrapped {
        #[serde(default)]
        photos: Vec<ContentItem>,
    },
    Bare(Vec<ContentItem>),
}

/// Parse a photo listing.
pub fn parse_payload(json: &str) -> Result<Vec<ContentItem>, SourceError> {
    let payload: Payload =
        serde_json::from_str(json).map_err(|e| SourceError::Parse(e.to_string()))?;
    Ok(match payload {
        Payload::Wrapped { photos } => photos,
        Payload::Bare(photos) => photos,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wrapped_listing() {
        let json = r#"{"photos":[
            {"id":"1","filename":"beach.jpg","url":"https://cdn/beach.jpg","tags":"beach,sun","user_id":"u1","likes":4},
            {"id":"2","filename":"pines.jpg","tags":"forest","vertical":true,"plaque_id":"p2"}
        ]}"#;
        let items = parse_payload(json).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "beach.jpg");
        assert!(items[1].vertical);
        assert_eq!(items[1].plaque_id.as_deref(), Some("p2"));
    }

    #[test]
    fn parses_bare_array() {
        let items = parse_payload(r#"[{"id":"7","filename":"x.jpg","tags":"x"}]"#).unwrap();
        assert_eq!(items[0].id.as_str(), "7");
    }

    #[test]
    fn empty_wrapper_is_empty_listing() {
        assert!(parse_payload("{}").unwrap().is_empty());
    }

    #[test]
    fn garbage_is_a_parse_error() {
        assert!(matches!(parse_payload("<html>"), Err(SourceError::Parse(_))));
    }
}
