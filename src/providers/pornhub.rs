use super::{Provider, ProviderId};

/// Recognized host without a known thumbnail source.
pub struct Pornhub;

impl Provider for Pornhub {
    const ID: ProviderId = ProviderId::Pornhub;
    const DISPLAY_NAME: &'static str = "Pornhub";
    const NAMES: &'static [&'static str] = &["Pornhub"];

    async fn thumbnail_url(_: &str) -> Result<String, anyhow::Error> {
        anyhow::bail!("thumbnails are not supported")
    }
}
