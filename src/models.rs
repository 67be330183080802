//! Core data models used throughout xkcd-index.
//!
//! A [`Comic`] is the unit fetched from the remote API and stored in the
//! local index. Field names follow the `info.0.json` payload exactly, so the
//! same type serves as the wire format and the on-disk record.

use serde::{Deserialize, Serialize};

/// One comic's metadata and text, as returned by `info.0.json`.
///
/// Fields absent from a payload default to empty. A payload that decodes
/// with `num == 0` carries no comic and is treated as missing by the
/// index builder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Comic {
    pub num: u32,
    pub year: String,
    pub month: String,
    pub day: String,
    pub title: String,
    pub safe_title: String,
    pub transcript: String,
    pub alt: String,
    pub img: String,
    pub link: String,
}

impl Comic {
    /// Publication date as `YYYY-MM-DD`, built from the stored components
    /// without calendar validation.
    pub fn date(&self) -> String {
        format!("{}-{}-{}", self.year, self.month, self.day)
    }

    /// Canonical page URL for this comic under `base_url`.
    pub fn page_url(&self, base_url: &str) -> String {
        format!("{}/{}/", base_url.trim_end_matches('/'), self.num)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_live_payload_and_ignores_extra_fields() {
        let body = r#"{
            "month": "4", "num": 571, "link": "", "year": "2009",
            "news": "", "safe_title": "Can't Sleep",
            "transcript": "[[Someone is in bed]]", "alt": "If androids someday DO dream",
            "img": "https://imgs.xkcd.com/comics/cant_sleep.png",
            "title": "Can't Sleep", "day": "20",
            "extra_parts": {"pre": ""}
        }"#;
        let comic: Comic = serde_json::from_str(body).unwrap();
        assert_eq!(comic.num, 571);
        assert_eq!(comic.safe_title, "Can't Sleep");
        assert_eq!(comic.date(), "2009-4-20");
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let comic: Comic = serde_json::from_str(r#"{"num": 3}"#).unwrap();
        assert_eq!(comic.num, 3);
        assert!(comic.title.is_empty());
        assert!(comic.transcript.is_empty());
    }

    #[test]
    fn page_url_ignores_trailing_slash() {
        let comic = Comic {
            num: 353,
            ..Comic::default()
        };
        assert_eq!(comic.page_url("https://xkcd.com/"), "https://xkcd.com/353/");
        assert_eq!(comic.page_url("https://xkcd.com"), "https://xkcd.com/353/");
    }
}
