use super::{Provider, ProviderId};

/// Fallback for embed code of an unrecognized host.
pub struct Undefined;

impl Provider for Undefined {
    const ID: ProviderId = ProviderId::Undefined;
    const DISPLAY_NAME: &'static str = "Undefined";
    const NAMES: &'static [&'static str] = &["Undefined"];

    async fn thumbnail_url(_: &str) -> Result<String, anyhow::Error> {
        anyhow::bail!("unknown provider")
    }
}
