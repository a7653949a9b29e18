use anyhow::Context;
use once_cell::sync::Lazy;
use regex::Regex;

use super::utils::capture_group;
use super::{Provider, ProviderId};
use crate::fetch::{self, FetchProfile};

pub struct Xhamster;

impl Provider for Xhamster {
    const ID: ProviderId = ProviderId::Xhamster;
    const DISPLAY_NAME: &'static str = "xHamster";
    const NAMES: &'static [&'static str] = &["Xhamster"];

    async fn thumbnail_url(code: &str) -> Result<String, anyhow::Error> {
        static CLIP_ID_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r#"embed/([^"]+)""#).unwrap());

        let clip_id = capture_group(&CLIP_ID_REGEX, code, 1).context("no clip id in embed code")?;

        thumbnail_from_embed_page(&embed_page_url(clip_id)).await
    }
}

pub fn embed_page_url(clip_id: &str) -> String {
    format!("http://xhamster.com/xembed.php?video={}", clip_id)
}

async fn thumbnail_from_embed_page(url: &str) -> Result<String, anyhow::Error> {
    let page = fetch::get_page_text(url, FetchProfile::Page)
        .await
        .context("failed to fetch embed page")?;

    find_thumbnail(&page)
}

/// First CDN thumbnail url in `page`, url-decoded. Bytes that don't decode to utf-8 are
/// replaced rather than rejected.
pub fn find_thumbnail(page: &str) -> Result<String, anyhow::Error> {
    static THUMBNAIL_REGEX: Lazy<Regex> =
        Lazy::new(|| Regex::new(r#"https://thumb-v-cl2.xhcdn.com/[^"]+.jpg"#).unwrap());

    let thumbnail = THUMBNAIL_REGEX
        .find(page)
        .context("no thumbnail url in embed page")?
        .as_str()
        .replace('+', " ");

    let decoded = urlencoding::decode_binary(thumbnail.as_bytes());

    Ok(String::from_utf8_lossy(&decoded).into_owned())
}
