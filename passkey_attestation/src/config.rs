use std::{env, sync::LazyLock};

use crate::origin::OriginMatching;

/// Primary relying party origin, e.g. `https://example.com`
pub(crate) static ORIGIN: LazyLock<Option<String>> = LazyLock::new(|| {
    env::var("ORIGIN")
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
});

// Static configuration for additional origins
pub(crate) static ADDITIONAL_ORIGINS: LazyLock<Vec<String>> = LazyLock::new(|| {
    env::var("WEBAUTHN_ADDITIONAL_ORIGINS")
        .map(|origins| parse_origin_list(&origins))
        .unwrap_or_default()
});

pub(crate) static ORIGIN_MATCHING: LazyLock<OriginMatching> = LazyLock::new(|| {
    match env::var("WEBAUTHN_ORIGIN_MATCHING").ok() {
        None => OriginMatching::Strict,
        Some(v) => parse_origin_matching(&v),
    }
});

pub(crate) static ANDROID_KEY_TEE_ENFORCED_ONLY: LazyLock<bool> = LazyLock::new(|| {
    env::var("ANDROID_KEY_TEE_ENFORCED_ONLY").map_or(
        false, // Default to accepting software-enforced lists too
        |v| parse_bool_setting("ANDROID_KEY_TEE_ENFORCED_ONLY", &v, false),
    )
});

pub(crate) fn parse_origin_list(origins: &str) -> Vec<String> {
    origins
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

pub(crate) fn parse_origin_matching(value: &str) -> OriginMatching {
    match value.trim().to_lowercase().as_str() {
        "strict" => OriginMatching::Strict,
        "relaxed" => OriginMatching::Relaxed,
        invalid => {
            tracing::warn!(
                "Invalid origin matching mode: {}. Using default 'strict'",
                invalid
            );
            OriginMatching::Strict
        }
    }
}

pub(crate) fn parse_bool_setting(name: &str, value: &str, default: bool) -> bool {
    match value.trim().to_lowercase().as_str() {
        "true" => true,
        "false" => false,
        invalid => {
            tracing::warn!("Invalid {}: {}. Using default '{}'", name, invalid, default);
            default
        }
    }
}
