use crate::schema::pixi::DependencySpec;
use log::warn;
use pep440_rs::VersionSpecifiers;
use pep508_rs::{Requirement, VersionOrUrl};
use std::str::FromStr;
use url::Url;

/// Split a requirement from the `pip` section of a conda environment into the package name, as
/// written in the requirement, and its pixi counterpart.
///
/// <https://pixi.sh/latest/reference/pixi_manifest/#pypi-dependencies>
pub fn parse(requirement: &str) -> Result<(String, DependencySpec), String> {
    let requirement = match requirement.split_once(" #") {
        Some((requirement, _)) => requirement,
        None => requirement,
    }
    .trim();

    // Package names cannot start with a hyphen, so those are pip options (`-e`, `-r`,
    // `--index-url`, ...) that have no equivalent in a pixi manifest.
    if requirement.starts_with('-') {
        return Err("pip options are not supported".to_string());
    }

    let parsed = Requirement::<Url>::from_str(requirement)
        .map_err(|_| "not a valid PEP 508 requirement".to_string())?;

    let name_length = requirement
        .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
        .unwrap_or(requirement.len());
    let name = requirement[..name_length].to_string();

    let mut dependency_spec = match parsed.version_or_url {
        None => DependencySpec::any(),
        Some(VersionOrUrl::VersionSpecifier(specifiers)) => {
            DependencySpec::version(join_specifiers(&specifiers))
        }
        Some(VersionOrUrl::Url(url)) => from_url(&url),
    };
    dependency_spec.extras = parsed.extras.iter().map(ToString::to_string).collect();

    if !parsed.marker.is_true() {
        warn!(
            "Environment markers of \"{requirement}\" cannot be expressed in a pixi manifest, so they were dropped."
        );
    }

    Ok((name, dependency_spec))
}

fn join_specifiers(specifiers: &VersionSpecifiers) -> String {
    if specifiers.is_empty() {
        return "*".to_string();
    }

    specifiers
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<String>>()
        .join(",")
}

fn from_url(url: &Url) -> DependencySpec {
    if let Some(scheme) = url.scheme().strip_prefix("git+") {
        let mut git = url.clone();
        git.set_fragment(None);

        let (location, rev) = match git.path().rsplit_once('@') {
            Some((path, rev)) if !rev.contains('/') => (
                format!("{scheme}://{}{path}", authority(&git)),
                Some(rev.to_string()),
            ),
            _ => (format!("{scheme}://{}{}", authority(&git), git.path()), None),
        };

        return DependencySpec {
            version: None,
            git: Some(location),
            rev,
            ..Default::default()
        };
    }

    if url.scheme() == "file" {
        return DependencySpec {
            version: None,
            path: Some(url.path().to_string()),
            ..Default::default()
        };
    }

    DependencySpec {
        version: None,
        url: Some(url.to_string()),
        ..Default::default()
    }
}

fn authority(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();

    let user = match (url.username(), url.password()) {
        ("", _) => String::new(),
        (username, None) => format!("{username}@"),
        (username, Some(password)) => format!("{username}:{password}@"),
    };

    match url.port() {
        Some(port) => format!("{user}{host}:{port}"),
        None => format!("{user}{host}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("requests", "requests", "*")]
    #[case("requests==2.32.3", "requests", "==2.32.3")]
    #[case("requests>=2.0,<3", "requests", ">=2.0,<3")]
    #[case("requests >= 2.0", "requests", ">=2.0")]
    #[case("Flask_Cors~=4.0", "Flask_Cors", "~=4.0")]
    #[case("zope.interface", "zope.interface", "*")]
    #[case("requests==2.*", "requests", "==2.*")]
    #[case("requests  # HTTP for humans", "requests", "*")]
    fn test_parse_version(#[case] requirement: &str, #[case] name: &str, #[case] version: &str) {
        assert_eq!(
            parse(requirement),
            Ok((name.to_string(), DependencySpec::version(version)))
        );
    }

    #[test]
    fn test_parse_extras() {
        assert_eq!(
            parse("requests[socks,security]>=2"),
            Ok((
                "requests".to_string(),
                DependencySpec {
                    version: Some(">=2".to_string()),
                    extras: vec!["socks".to_string(), "security".to_string()],
                    ..Default::default()
                }
            ))
        );
    }

    #[rstest]
    #[case(
        "foo @ git+https://github.com/foo/foo.git",
        "https://github.com/foo/foo.git",
        None
    )]
    #[case(
        "foo @ git+https://github.com/foo/foo.git@v1.0.0",
        "https://github.com/foo/foo.git",
        Some("v1.0.0")
    )]
    #[case(
        "foo @ git+ssh://git@github.com/foo/foo.git@main#egg=foo",
        "ssh://git@github.com/foo/foo.git",
        Some("main")
    )]
    fn test_parse_git(#[case] requirement: &str, #[case] git: &str, #[case] rev: Option<&str>) {
        assert_eq!(
            parse(requirement),
            Ok((
                "foo".to_string(),
                DependencySpec {
                    git: Some(git.to_string()),
                    rev: rev.map(ToString::to_string),
                    ..Default::default()
                }
            ))
        );
    }

    #[test]
    fn test_parse_url() {
        assert_eq!(
            parse("foo @ https://example.com/foo-1.0.0-py3-none-any.whl"),
            Ok((
                "foo".to_string(),
                DependencySpec {
                    url: Some("https://example.com/foo-1.0.0-py3-none-any.whl".to_string()),
                    ..Default::default()
                }
            ))
        );
    }

    #[test]
    fn test_parse_file_url() {
        assert_eq!(
            parse("foo @ file:///opt/wheels/foo-1.0.0.tar.gz"),
            Ok((
                "foo".to_string(),
                DependencySpec {
                    path: Some("/opt/wheels/foo-1.0.0.tar.gz".to_string()),
                    ..Default::default()
                }
            ))
        );
    }

    #[rstest]
    #[case("-e .", "pip options are not supported")]
    #[case("--index-url https://example.com/simple", "pip options are not supported")]
    #[case("requests>=", "not a valid PEP 508 requirement")]
    #[case("", "not a valid PEP 508 requirement")]
    fn test_parse_unsupported(#[case] requirement: &str, #[case] error: &str) {
        assert_eq!(parse(requirement), Err(error.to_string()));
    }

    #[test]
    fn test_parse_markers() {
        assert_eq!(
            parse("pywin32>=306; sys_platform == 'win32'"),
            Ok(("pywin32".to_string(), DependencySpec::version(">=306")))
        );
    }
}
