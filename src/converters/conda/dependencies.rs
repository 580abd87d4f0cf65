use crate::schema::pixi::DependencySpec;
use regex::Regex;
use std::sync::LazyLock;

static MATCH_SPEC_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?P<channel>[^:\s]+)::)?(?P<name>[A-Za-z0-9_.-]+)(?P<constraint>.*)$").unwrap()
});

static BRACKET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<constraint>[^\[\]]*)\[(?P<keys>[^\[\]]*)\]$").unwrap());

static BRACKET_KEY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?P<key>\w+)\s*=\s*(?:'(?P<single>[^']*)'|"(?P<double>[^"]*)"|(?P<bare>[^,\s'"]+))"#,
    )
    .unwrap()
});

const OPERATOR_CHARACTERS: [char; 6] = ['<', '>', '!', '=', ',', '|'];

/// Split a conda match spec (e.g. `numpy=1.2`, `conda-forge::numpy >=1.2`,
/// `numpy[version='>=1.2']`) into the package name and its pixi counterpart.
///
/// <https://docs.conda.io/projects/conda-build/en/latest/resources/package-spec.html#package-match-specifications>
pub fn parse(spec: &str, wildcard_pins: bool) -> Result<(String, DependencySpec), String> {
    let spec = spec.trim();

    let Some(captures) = MATCH_SPEC_REGEX.captures(spec) else {
        return Err("a package name is required".to_string());
    };

    let name = captures["name"].to_string();
    let constraint = captures["constraint"].trim();

    let mut dependency_spec = if constraint.contains(['[', ']']) {
        parse_bracket_constraint(constraint, wildcard_pins)?
    } else {
        parse_constraint(constraint, wildcard_pins)?
    };
    if dependency_spec.channel.is_none() {
        dependency_spec.channel = captures.name("channel").map(|c| c.as_str().to_string());
    }

    Ok((name, dependency_spec))
}

/// Parse a constraint using conda's bracket syntax (e.g. `[version='>=1.2', build=py_0]`),
/// where keys take precedence over the constraint written before the brackets.
fn parse_bracket_constraint(
    constraint: &str,
    wildcard_pins: bool,
) -> Result<DependencySpec, String> {
    let Some(captures) = BRACKET_REGEX.captures(constraint) else {
        return Err("unbalanced brackets".to_string());
    };

    let keys = &captures["keys"];
    if !BRACKET_KEY_REGEX
        .replace_all(keys, "")
        .trim_matches(|c: char| c == ',' || c.is_whitespace())
        .is_empty()
    {
        return Err(format!("\"[{keys}]\" is not a valid list of keys"));
    }

    let mut dependency_spec = parse_constraint(captures["constraint"].trim(), wildcard_pins)?;

    for key_captures in BRACKET_KEY_REGEX.captures_iter(keys) {
        let value = ["single", "double", "bare"]
            .into_iter()
            .find_map(|group| key_captures.name(group))
            .map_or("", |m| m.as_str())
            .trim();

        match &key_captures["key"] {
            "version" => dependency_spec.version = Some(translate_version(value, wildcard_pins)),
            "build" => dependency_spec.build = Some(value.to_string()),
            "channel" => dependency_spec.channel = Some(value.to_string()),
            key => return Err(format!("\"{key}\" cannot be expressed in a pixi manifest")),
        }
    }

    Ok(dependency_spec)
}

fn parse_constraint(constraint: &str, wildcard_pins: bool) -> Result<DependencySpec, String> {
    let tokens = tokenize(constraint);

    match tokens.as_slice() {
        [] => Ok(DependencySpec::any()),
        // Space-separated form, where the version can be followed by a build string.
        [version, build] if !version.ends_with([',', '|']) && is_plain(build) => {
            Ok(DependencySpec {
                version: Some(translate_version(version, wildcard_pins)),
                build: Some(build.clone()),
                ..Default::default()
            })
        }
        [pin] => parse_pin(pin, wildcard_pins),
        _ => Ok(DependencySpec::version(tokens.join(" "))),
    }
}

/// Split a constraint on whitespace, attaching operators written apart from their version
/// (e.g. `>= 1.2`) to the version that follows them.
fn tokenize(constraint: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut operator = String::new();

    for token in constraint.split_whitespace() {
        if token.chars().all(|c| OPERATOR_CHARACTERS.contains(&c)) {
            operator.push_str(token);
        } else {
            tokens.push(format!("{operator}{token}"));
            operator.clear();
        }
    }

    if !operator.is_empty() {
        tokens.push(operator);
    }
    tokens
}

fn parse_pin(pin: &str, wildcard_pins: bool) -> Result<DependencySpec, String> {
    if pin.chars().all(|c| OPERATOR_CHARACTERS.contains(&c)) {
        return Err(format!("a version is required after \"{pin}\""));
    }

    // `name=version=build`, where `version` can be a wildcard (e.g. `libblas=*=*mkl`).
    if let Some((version, build)) = pin
        .strip_prefix('=')
        .and_then(|pin| pin.split_once('='))
        .filter(|(version, build)| is_plain(version) && is_plain(build))
    {
        return Ok(DependencySpec {
            version: Some(widen(version, wildcard_pins)),
            build: Some(build.to_string()),
            ..Default::default()
        });
    }

    Ok(DependencySpec::version(translate_version(pin, wildcard_pins)))
}

/// Convert a conda version constraint to the one used in the pixi manifest. Only versions pinned
/// with a single `=` change: the `=` is dropped, and the version is widened if requested.
fn translate_version(version: &str, wildcard_pins: bool) -> String {
    match version.strip_prefix('=') {
        Some(pin) if is_plain(pin) => widen(pin, wildcard_pins),
        _ => version.to_string(),
    }
}

/// Widen a pinned version to the versions conda matches with it (e.g. `1.2` to `1.2.*`).
fn widen(version: &str, wildcard_pins: bool) -> String {
    if !wildcard_pins || version.ends_with('*') || version.split('.').count() >= 3 {
        return version.to_string();
    }
    format!("{version}.*")
}

fn is_plain(version: &str) -> bool {
    !version.is_empty() && !version.contains(OPERATOR_CHARACTERS)
}
