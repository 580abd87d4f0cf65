use regex::Regex;
use std::sync::LazyLock;

static ENVIRONMENT_NAME_NORMALIZATION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-_.]+").unwrap());

/// Normalize a conda environment name into a valid pixi feature and environment name, which only
/// allow lowercase letters, digits and hyphens.
pub fn normalize_environment_name(name: &str) -> String {
    ENVIRONMENT_NAME_NORMALIZATION_REGEX
        .replace_all(name.trim(), "-")
        .to_lowercase()
}
