use std::time::Duration;

use anyhow::Context;
use once_cell::sync::Lazy;
use reqwest::redirect::Policy;

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/116.0.0.0 Safari/537.36";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(20);

/// How a single thumbnail lookup talks to a remote host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FetchProfile {
    /// Metadata API calls: short timeout, no certificate check, body read whatever the status.
    Api,
    /// Plain page downloads.
    Page,
}

impl FetchProfile {
    fn timeout(self) -> Duration {
        match self {
            FetchProfile::Api => Duration::from_secs(5),
            FetchProfile::Page => Duration::from_secs(20),
        }
    }

    fn accept_invalid_certs(self) -> bool {
        matches!(self, FetchProfile::Api)
    }

    fn follow_redirects(self) -> bool {
        matches!(self, FetchProfile::Page)
    }

    /// Non-2xx statuses count as a failed fetch instead of having their body read.
    fn require_success(self) -> bool {
        matches!(self, FetchProfile::Page)
    }

    fn client(self) -> Option<&'static reqwest::Client> {
        static API_CLIENT: Lazy<Option<reqwest::Client>> = Lazy::new(|| build_client(FetchProfile::Api));
        static PAGE_CLIENT: Lazy<Option<reqwest::Client>> = Lazy::new(|| build_client(FetchProfile::Page));

        match self {
            FetchProfile::Api => API_CLIENT.as_ref(),
            FetchProfile::Page => PAGE_CLIENT.as_ref(),
        }
    }
}

fn build_client(profile: FetchProfile) -> Option<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(DEFAULT_USER_AGENT)
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(profile.timeout())
        .danger_accept_invalid_certs(profile.accept_invalid_certs())
        .redirect(if profile.follow_redirects() {
            Policy::limited(10)
        } else {
            Policy::none()
        })
        .build();

    match client {
        Ok(client) => Some(client),
        Err(err) => {
            log::warn!("Failed to build http client: {}", err);
            None
        }
    }
}

/// Downloads `url` and returns the body as text. An empty body counts as a failure.
pub(crate) async fn get_page_text(url: &str, profile: FetchProfile) -> Result<String, anyhow::Error> {
    let client = profile.client().context("http client is unavailable")?;

    log::trace!("Fetching {}", url);

    let response = client.get(url).send().await.context("failed to request url")?;
    let response = if profile.require_success() {
        response.error_for_status().context("server returned an error status")?
    } else {
        response
    };

    let text = response.text().await.context("failed to parse response body as text")?;

    if text.is_empty() {
        anyhow::bail!("response body is empty");
    }

    Ok(text)
}
