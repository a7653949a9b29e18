use anyhow::Context;
use once_cell::sync::Lazy;
use regex::Regex;

use super::utils::capture_group;
use super::{Provider, ProviderId};

pub struct Dailymotion;

impl Provider for Dailymotion {
    const ID: ProviderId = ProviderId::Dailymotion;
    const DISPLAY_NAME: &'static str = "Dailymotion";
    const NAMES: &'static [&'static str] = &["Dailymotion"];

    async fn thumbnail_url(code: &str) -> Result<String, anyhow::Error> {
        static CLIP_ID_REGEX: Lazy<Regex> =
            Lazy::new(|| Regex::new(r#"//www.dailymotion.com/(swf|embed)/video/([^"]+)""#).unwrap());

        let clip_id = capture_group(&CLIP_ID_REGEX, code, 2).context("no clip id in embed code")?;

        Ok(format!("//www.dailymotion.com/thumbnail/video/{}", clip_id))
    }
}
