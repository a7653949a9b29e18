pub(crate) mod fetch;
pub mod providers;

pub use providers::{
    detect_provider, init_detection_rules, resolve_thumbnail, resolve_thumbnail_with_provider_name, ProviderId,
    ThumbnailResult, UNDEFINED,
};
