use anyhow::Context;
use once_cell::sync::Lazy;
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use regex::Regex;

use super::{Provider, ProviderId};
use crate::fetch::{self, FetchProfile};

pub struct Vimeo;

impl Provider for Vimeo {
    const ID: ProviderId = ProviderId::Vimeo;
    const DISPLAY_NAME: &'static str = "Vimeo";
    const NAMES: &'static [&'static str] = &["Vimeo"];

    async fn thumbnail_url(code: &str) -> Result<String, anyhow::Error> {
        let clip_id = clip_id(code).context("no clip id in embed code")?;

        thumbnail_from_api(&api_url(clip_id)).await
    }
}

/// Metadata document of a clip.
pub fn api_url(clip_id: &str) -> String {
    format!("https://vimeo.com/api/v2/video/{}.xml", clip_id)
}

/// Clip id of the first direct or player link in `code`.
pub fn clip_id(code: &str) -> Option<&str> {
    static CLIP_ID_REGEX: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r#"https://vimeo\.com/([0-9]*)"|https://player\.vimeo\.com/video/([0-9]*)\?"#).unwrap()
    });

    let captures = CLIP_ID_REGEX.captures(code)?;
    let direct = captures.get(1).map(|group| group.as_str());
    let player = captures.get(2).map(|group| group.as_str());

    preferred_clip_id(direct, player)
}

/// The player link id wins over the direct link id. Empty ids and "0" don't count.
fn preferred_clip_id<'a>(direct: Option<&'a str>, player: Option<&'a str>) -> Option<&'a str> {
    [player, direct]
        .into_iter()
        .flatten()
        .find(|id| !id.is_empty() && *id != "0")
}

async fn thumbnail_from_api(url: &str) -> Result<String, anyhow::Error> {
    let xml = fetch::get_page_text(url, FetchProfile::Api)
        .await
        .context("failed to fetch video metadata")?;

    parse_thumbnail_small(&xml)
}

/// Text of the first `thumbnail_small` element of the first `video` element below the root.
/// The whole document has to be well-formed.
pub fn parse_thumbnail_small(xml: &str) -> Result<String, anyhow::Error> {
    let mut reader = Reader::from_str(xml);

    let mut depth = 0usize;
    let mut has_root = false;
    let mut seen_video = false;
    let mut in_first_video = false;
    let mut in_thumbnail = false;
    let mut thumbnail: Option<String> = None;

    loop {
        let event = reader.read_event().context("malformed video metadata")?;

        match event {
            Event::Start(ref element) | Event::Empty(ref element) => {
                let is_empty = matches!(event, Event::Empty(_));
                let name = element.name();

                match depth {
                    0 if has_root => anyhow::bail!("malformed video metadata: more than one root element"),
                    0 => has_root = true,
                    1 if name.as_ref() == b"video" => {
                        in_first_video = !seen_video && !is_empty;
                        seen_video = true;
                    }
                    2 if in_first_video && name.as_ref() == b"thumbnail_small" && thumbnail.is_none() => {
                        thumbnail = Some(String::new());
                        in_thumbnail = !is_empty;
                    }
                    _ => {}
                }

                if !is_empty {
                    depth += 1;
                }
            }
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                match depth {
                    2 => in_thumbnail = false,
                    1 => in_first_video = false,
                    _ => {}
                }
            }
            Event::Text(text) if depth == 0 => {
                if text.iter().any(|byte| !byte.is_ascii_whitespace()) {
                    anyhow::bail!("malformed video metadata: text outside of the root element");
                }
            }
            Event::Text(text) if in_thumbnail && depth == 3 => {
                let text = text.unescape().context("malformed video metadata")?;
                thumbnail.get_or_insert_with(String::new).push_str(&text);
            }
            Event::CData(data) if in_thumbnail && depth == 3 => {
                let data = std::str::from_utf8(&data).context("malformed video metadata")?;
                thumbnail.get_or_insert_with(String::new).push_str(data);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !has_root {
        anyhow::bail!("malformed video metadata: no root element");
    }

    if depth != 0 {
        anyhow::bail!("malformed video metadata: unexpected end of document");
    }

    thumbnail
        .filter(|thumbnail| !thumbnail.is_empty())
        .context("no thumbnail in video metadata")
}

#[cfg(test)]
mod tests {
    use super::{api_url, clip_id, parse_thumbnail_small, preferred_clip_id, thumbnail_from_api, Vimeo};
    use crate::fetch::test_server::serve_once;
    use crate::providers::{Provider, ThumbnailResult};

    const METADATA: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<videos>
    <video>
        <id>76979871</id>
        <title>The New Vimeo Player (You Know, For Videos)</title>
        <url>https://vimeo.com/76979871</url>
        <thumbnail_small>https://i.vimeocdn.com/video/452001751-8216e0571c251a09d7a8387550942d89f7f86f6398f8ed886e639b0dd50d3c90-d_100x75</thumbnail_small>
        <thumbnail_medium>https://i.vimeocdn.com/video/452001751-d_200x150</thumbnail_medium>
        <thumbnail_large>https://i.vimeocdn.com/video/452001751-d_640</thumbnail_large>
    </video>
</videos>"#;

    #[test]
    fn test_clip_id() {
        let code = r#"<iframe src="https://player.vimeo.com/video/76979871?h=8272103f6e" width="640" height="360" frameborder="0"></iframe>"#;
        assert_eq!(clip_id(code), Some("76979871"));

        let code = r#"<p><a href="https://vimeo.com/76979871">The New Vimeo Player</a></p>"#;
        assert_eq!(clip_id(code), Some("76979871"));

        // only the first link is looked at
        let code = r#"<iframe src="https://player.vimeo.com/video/111?x"></iframe><a href="https://vimeo.com/222">"#;
        assert_eq!(clip_id(code), Some("111"));
        let code = r#"<a href="https://vimeo.com/222"></a><iframe src="https://player.vimeo.com/video/111?x"></iframe>"#;
        assert_eq!(clip_id(code), Some("222"));

        assert_eq!(clip_id(r#"<a href="https://vimeo.com/">"#), None);
        assert_eq!(clip_id(r#"<a href="https://vimeo.com/0">"#), None);
        assert_eq!(clip_id(r#"<iframe src="http://player.vimeo.com/video/111?x">"#), None);
    }

    #[test]
    fn test_preferred_clip_id() {
        assert_eq!(preferred_clip_id(Some("1"), Some("2")), Some("2"));
        assert_eq!(preferred_clip_id(Some("1"), Some("")), Some("1"));
        assert_eq!(preferred_clip_id(Some("1"), Some("0")), Some("1"));
        assert_eq!(preferred_clip_id(None, Some("2")), Some("2"));
        assert_eq!(preferred_clip_id(Some(""), None), None);
        assert_eq!(preferred_clip_id(None, None), None);
    }

    #[test]
    fn test_parse_thumbnail_small() {
        assert_eq!(
            parse_thumbnail_small(METADATA).unwrap(),
            "https://i.vimeocdn.com/video/452001751-8216e0571c251a09d7a8387550942d89f7f86f6398f8ed886e639b0dd50d3c90-d_100x75"
        );

        let xml = "<videos><video><thumbnail_small>a&amp;b</thumbnail_small></video></videos>";
        assert_eq!(parse_thumbnail_small(xml).unwrap(), "a&b");

        let xml = "<videos><video><thumbnail_small><![CDATA[https://i/1.jpg]]></thumbnail_small></video></videos>";
        assert_eq!(parse_thumbnail_small(xml).unwrap(), "https://i/1.jpg");
    }

    #[test]
    fn test_parse_thumbnail_small_first_video_only() {
        let xml = "<videos><video><id>1</id></video><video><thumbnail_small>x</thumbnail_small></video></videos>";
        assert!(parse_thumbnail_small(xml).is_err());

        let xml = "<videos><video><thumbnail_small>x</thumbnail_small><thumbnail_small>y</thumbnail_small></video></videos>";
        assert_eq!(parse_thumbnail_small(xml).unwrap(), "x");

        let xml = "<videos><thumbnail_small>x</thumbnail_small></videos>";
        assert!(parse_thumbnail_small(xml).is_err());
    }

    #[test]
    fn test_parse_thumbnail_small_malformed() {
        let cases = [
            "",
            "not xml at all",
            "<videos><video><thumbnail_small>x</thumbnail_small></video>",
            "<videos><video><thumbnail_small>x</thumbnail_small></videos></video>",
            "<videos><video><thumbnail_small>x</thumbnail_small></video></videos><videos/>",
            "<videos><video><thumbnail_small/></video></videos>",
            "<videos><video><thumbnail_small></thumbnail_small></video></videos>",
            "junk<videos><video><thumbnail_small>x</thumbnail_small></video></videos>",
            "<videos><video><thumbnail_small>x</thumbnail_small></video></videos>trailing",
            "<html><body>Service Unavailable</body></html>",
        ];

        for xml in cases {
            assert!(parse_thumbnail_small(xml).is_err(), "{}", xml);
        }
    }

    #[tokio::test]
    async fn test_vimeo_without_clip_id() {
        let code = r#"<iframe src="https://player.vimeo.com/video/76979871" frameborder="0"></iframe>"#;
        assert_eq!(Vimeo::get_thumb_url(code).await, ThumbnailResult::Undefined);
    }

    #[test]
    fn test_parse_thumbnail_small_surrounding_whitespace() {
        let xml = "\n  <videos><video><thumbnail_small>x</thumbnail_small></video></videos>\n";
        assert_eq!(parse_thumbnail_small(xml).unwrap(), "x");
    }

    #[test]
    fn test_api_url() {
        assert_eq!(api_url("76979871"), "https://vimeo.com/api/v2/video/76979871.xml");
    }

    #[tokio::test]
    async fn test_thumbnail_from_api() {
        let url = serve_once("200 OK", METADATA).await;
        assert_eq!(
            thumbnail_from_api(&format!("{}/api/v2/video/76979871.xml", url)).await.unwrap(),
            "https://i.vimeocdn.com/video/452001751-8216e0571c251a09d7a8387550942d89f7f86f6398f8ed886e639b0dd50d3c90-d_100x75"
        );

        // the body is used whatever the status
        let url = serve_once("404 Not Found", METADATA).await;
        assert!(thumbnail_from_api(&url).await.is_ok());

        let url = serve_once("200 OK", "").await;
        assert!(thumbnail_from_api(&url).await.is_err());

        let url = serve_once("200 OK", "<html>Not a video</html>").await;
        assert!(thumbnail_from_api(&url).await.is_err());
    }

    #[tokio::test]
    async fn test_fetch_failure() {
        assert!(thumbnail_from_api("http://127.0.0.1:9/api/v2/video/1.xml").await.is_err());
    }
}
