use anyhow::Context;
use once_cell::sync::Lazy;
use regex::Regex;

use super::utils::capture_group;
use super::{Provider, ProviderId};

pub struct Youtube;

impl Provider for Youtube {
    const ID: ProviderId = ProviderId::Youtube;
    const DISPLAY_NAME: &'static str = "YouTube";
    const NAMES: &'static [&'static str] = &["Youtube"];

    async fn thumbnail_url(code: &str) -> Result<String, anyhow::Error> {
        static CLIP_ID_REGEX: Lazy<Regex> =
            Lazy::new(|| Regex::new(r#"//www\.youtube(-nocookie)?\.com/(v|embed)/([^?&"]+)[?&"]"#).unwrap());

        let clip_id = capture_group(&CLIP_ID_REGEX, code, 3).context("no clip id in embed code")?;

        Ok(format!("http://img.youtube.com/vi/{}/default.jpg", clip_id))
    }
}
