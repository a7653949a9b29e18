use std::fmt::{self, Display};

use enum_iterator::Sequence;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::providers::dailymotion::Dailymotion;
use crate::providers::metacafe::Metacafe;
use crate::providers::pornhub::Pornhub;
use crate::providers::undefined::Undefined;
use crate::providers::vimeo::Vimeo;
use crate::providers::xhamster::Xhamster;
use crate::providers::youtube::Youtube;

pub mod dailymotion;
pub mod metacafe;
pub mod pornhub;
pub mod undefined;
pub mod vimeo;
pub mod xhamster;
pub mod youtube;

/// Sentinel returned whenever no thumbnail could be resolved.
pub const UNDEFINED: &str = "undefined";

/// Known video hosts. Declaration order is the order used for detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Sequence)]
pub enum ProviderId {
    Youtube,
    Metacafe,
    Dailymotion,
    Pornhub,
    Vimeo,
    Xhamster,
    Undefined,
}

impl ProviderId {
    pub const fn as_str(self) -> &'static str {
        match self {
            ProviderId::Youtube => "youtube",
            ProviderId::Metacafe => "metacafe",
            ProviderId::Dailymotion => "dailymotion",
            ProviderId::Pornhub => "pornhub",
            ProviderId::Vimeo => "vimeo",
            ProviderId::Xhamster => "xhamster",
            ProviderId::Undefined => UNDEFINED,
        }
    }

    /// Unanchored pattern searched for in embed code to recognize the host.
    pub const fn detection_pattern(self) -> Option<&'static str> {
        match self {
            ProviderId::Youtube => Some(r"//www.youtube(-nocookie)?.com/"),
            ProviderId::Metacafe => Some(r"//www.metacafe.com/"),
            ProviderId::Dailymotion => Some(r"//www.dailymotion.com/"),
            ProviderId::Pornhub => Some(r"//www.pornhub.com/"),
            ProviderId::Vimeo => Some(r"//(player\.)?vimeo.com/"),
            ProviderId::Xhamster => Some(r"//xhamster.com/"),
            ProviderId::Undefined => None,
        }
    }

    /// Case-insensitive lookup of a registered provider.
    pub fn from_name(name: &str) -> Option<ProviderId> {
        provider_id_for_name(name)
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Either a thumbnail url or the `undefined` sentinel. Every failure collapses into
/// [ThumbnailResult::Undefined].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ThumbnailResult {
    Url(String),
    Undefined,
}

impl ThumbnailResult {
    pub fn as_str(&self) -> &str {
        match self {
            ThumbnailResult::Url(url) => url,
            ThumbnailResult::Undefined => UNDEFINED,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, ThumbnailResult::Undefined)
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            ThumbnailResult::Url(url) => Some(url),
            ThumbnailResult::Undefined => None,
        }
    }

    pub fn into_option(self) -> Option<String> {
        match self {
            ThumbnailResult::Url(url) => Some(url),
            ThumbnailResult::Undefined => None,
        }
    }
}

impl From<Option<String>> for ThumbnailResult {
    fn from(url: Option<String>) -> Self {
        match url {
            Some(url) if !url.is_empty() => ThumbnailResult::Url(url),
            _ => ThumbnailResult::Undefined,
        }
    }
}

impl Display for ThumbnailResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct DetectionRule {
    pub provider: ProviderId,
    pub pattern: Regex,
}

static DETECTION_RULES: Lazy<Vec<DetectionRule>> = Lazy::new(build_detection_rules);

fn build_detection_rules() -> Vec<DetectionRule> {
    enum_iterator::all::<ProviderId>()
        .filter_map(|provider| {
            provider.detection_pattern().map(|pattern| DetectionRule {
                provider,
                pattern: Regex::new(pattern).unwrap(),
            })
        })
        .collect()
}

/// Builds the detection table if no caller has done so yet. Calling it again is a no-op.
pub fn init_detection_rules() {
    Lazy::force(&DETECTION_RULES);
}

pub fn detection_rules() -> &'static [DetectionRule] {
    &DETECTION_RULES
}

/// Returns the first provider whose pattern occurs in `code`, or [ProviderId::Undefined].
pub fn detect_provider(code: &str) -> ProviderId {
    let provider = detect_with_rules(&DETECTION_RULES, code);

    log::trace!("Detected provider: {}", provider);

    provider
}

fn detect_with_rules(rules: &[DetectionRule], code: &str) -> ProviderId {
    rules
        .iter()
        .find(|rule| rule.pattern.is_match(code))
        .map(|rule| rule.provider)
        .unwrap_or(ProviderId::Undefined)
}

macro_rules! normalized_name {
    ($name:expr, $prov:ty $(, $tail:ty)* $(,)?) => {
        if <$prov>::NAMES.iter().any(|name| $name.eq_ignore_ascii_case(name)) {
            Some(<$prov>::DISPLAY_NAME)
        } else {
            normalized_name!($name, $($tail),*)
        }
    };
    ($name:expr $(,)?) => {
        None
    };
}

macro_rules! provider_id_for_name {
    ($name:expr, $prov:ty $(, $tail:ty)* $(,)?) => {
        if <$prov>::NAMES.iter().any(|name| $name.eq_ignore_ascii_case(name)) {
            Some(<$prov>::ID)
        } else {
            provider_id_for_name!($name, $($tail),*)
        }
    };
    ($name:expr $(,)?) => {
        None
    };
}

macro_rules! get_thumb_url_for_id {
    ($code:expr, $id:expr, $prov:ty $(, $tail:ty)* $(,)?) => {
        if <$prov>::ID == $id {
            Some(<$prov>::get_thumb_url($code).await)
        } else {
            get_thumb_url_for_id!($code, $id, $($tail),*)
        }
    };
    ($code:expr, $id:expr $(,)?) => {
        None
    };
}

macro_rules! create_functions_for_providers {
    ($( $prov:ty ),* $(,)?) => {
        pub fn normalized_name(name: &str) -> Option<&'static str> {
            normalized_name!(name, $($prov),*)
        }

        pub fn exists_provider_with_name(name: &str) -> bool {
            provider_id_for_name(name).is_some()
        }

        fn provider_id_for_name(name: &str) -> Option<ProviderId> {
            provider_id_for_name!(name, $($prov),*)
        }

        /// `None` when no provider is registered for `id`.
        async fn get_thumb_url_for_id(code: &str, id: ProviderId) -> Option<ThumbnailResult> {
            get_thumb_url_for_id!(code, id, $($prov),*)
        }
    };
    () => {};
}

create_functions_for_providers! {
    Youtube,
    Metacafe,
    Dailymotion,
    Pornhub,
    Vimeo,
    Xhamster,
    Undefined,
}

/// Resolves the thumbnail of the clip embedded in `code`. The provider is detected when not
/// given.
pub async fn resolve_thumbnail(code: &str, provider: Option<ProviderId>) -> ThumbnailResult {
    let provider = provider.unwrap_or_else(|| detect_provider(code));

    match get_thumb_url_for_id(code, provider).await {
        Some(result) => result,
        None => Undefined::get_thumb_url(code).await,
    }
}

/// Like [resolve_thumbnail], with the provider given by name. An empty name means
/// auto-detection, a name no provider answers to resolves to `undefined`.
pub async fn resolve_thumbnail_with_provider_name(code: &str, name: &str) -> ThumbnailResult {
    if name.is_empty() {
        return resolve_thumbnail(code, None).await;
    }

    match provider_id_for_name(name) {
        Some(provider) => resolve_thumbnail(code, Some(provider)).await,
        None => {
            log::debug!("No provider named: {}", name);
            ThumbnailResult::Undefined
        }
    }
}

pub trait Provider {
    const ID: ProviderId;
    const DISPLAY_NAME: &'static str;
    const NAMES: &'static [&'static str];

    /// Resolves the thumbnail, keeping the reason when that is not possible.
    async fn thumbnail_url(code: &str) -> Result<String, anyhow::Error>;

    async fn get_thumb_url(code: &str) -> ThumbnailResult {
        match Self::thumbnail_url(code).await {
            Ok(url) if !url.is_empty() => ThumbnailResult::Url(url),
            Ok(_) => {
                log::debug!("{}: resolved thumbnail url is empty", Self::DISPLAY_NAME);
                ThumbnailResult::Undefined
            }
            Err(err) => {
                log::debug!("{}: {:#}", Self::DISPLAY_NAME, err);
                ThumbnailResult::Undefined
            }
        }
    }
}

pub mod utils {
    use regex::Regex;

    /// Text of capture group `group` in the first match of `regex`, if that group took part.
    pub fn capture_group<'a>(regex: &Regex, code: &'a str, group: usize) -> Option<&'a str> {
        regex
            .captures(code)
            .and_then(|captures| captures.get(group))
            .map(|group| group.as_str())
    }

}
