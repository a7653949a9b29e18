use anyhow::Context;
use once_cell::sync::Lazy;
use regex::Regex;

use super::utils::capture_group;
use super::{Provider, ProviderId};

pub struct Metacafe;

impl Provider for Metacafe {
    const ID: ProviderId = ProviderId::Metacafe;
    const DISPLAY_NAME: &'static str = "Metacafe";
    const NAMES: &'static [&'static str] = &["Metacafe"];

    async fn thumbnail_url(code: &str) -> Result<String, anyhow::Error> {
        static CLIP_ID_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"http://www.metacafe.com/embed/([^/]+)/").unwrap());

        let clip_id = capture_group(&CLIP_ID_REGEX, code, 1)
            .map(leading_integer)
            .context("no clip id in embed code")?;

        Ok(format!(
            "http://cdn.mcstatic.com/contents/videos_screenshots/{}/{}/preview.jpg",
            screenshot_folder(clip_id),
            clip_id
        ))
    }
}

/// Screenshots are stored in folders of 1000 clips: the id with its last three digits dropped,
/// times 1000. Ids below 1000 land in folder 0.
pub fn screenshot_folder(clip_id: i64) -> i64 {
    clip_id / 1000 * 1000
}

/// Integer value of the numeric prefix of `input` (after leading whitespace), 0 when there is
/// none. A prefix with a fraction or exponent, like `1.5e3`, is read as a float and truncated.
/// Out of range values saturate.
pub fn leading_integer(input: &str) -> i64 {
    static NUMERIC_PREFIX_REGEX: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^\s*[+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?").unwrap());

    let Some(prefix) = NUMERIC_PREFIX_REGEX.find(input).map(|prefix| prefix.as_str().trim_start()) else {
        return 0;
    };

    if prefix.contains(['.', 'e', 'E']) {
        prefix.parse::<f64>().map(|value| value as i64).unwrap_or(0)
    } else {
        prefix
            .parse::<i64>()
            .unwrap_or(if prefix.starts_with('-') { i64::MIN } else { i64::MAX })
    }
}
