use indexmap::{IndexMap, IndexSet};
use toml_edit::{Array, InlineTable, Value};

/// Version requirement of a dependency in a pixi manifest, either written as a plain version
/// string (e.g. `numpy = "1.2"`), or as an inline table when more than the version is known
/// (e.g. `numpy = { version = "1.2", build = "py_0" }`).
///
/// <https://pixi.sh/latest/reference/pixi_manifest/#dependencies>
#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct DependencySpec {
    pub version: Option<String>,
    pub build: Option<String>,
    pub channel: Option<String>,
    pub extras: Vec<String>,
    pub git: Option<String>,
    pub rev: Option<String>,
    pub url: Option<String>,
    pub path: Option<String>,
}

impl DependencySpec {
    pub fn version(version: impl Into<String>) -> Self {
        Self {
            version: Some(version.into()),
            ..Default::default()
        }
    }

    pub fn any() -> Self {
        Self::version("*")
    }

    fn is_version_only(&self) -> bool {
        self.build.is_none()
            && self.channel.is_none()
            && self.extras.is_empty()
            && self.git.is_none()
            && self.rev.is_none()
            && self.url.is_none()
            && self.path.is_none()
    }

    pub fn to_toml_value(&self) -> Value {
        if self.is_version_only() {
            return Value::from(self.version.as_deref().unwrap_or("*"));
        }

        let mut table = InlineTable::new();

        for (key, value) in [
            ("version", &self.version),
            ("build", &self.build),
            ("channel", &self.channel),
        ] {
            if let Some(value) = value {
                table.insert(key, Value::from(value.as_str()));
            }
        }

        if !self.extras.is_empty() {
            table.insert("extras", Value::from(Array::from_iter(&self.extras)));
        }

        for (key, value) in [
            ("git", &self.git),
            ("rev", &self.rev),
            ("url", &self.url),
            ("path", &self.path),
        ] {
            if let Some(value) = value {
                table.insert(key, Value::from(value.as_str()));
            }
        }

        Value::InlineTable(table)
    }
}

/// Conda and PyPI dependencies, keyed by package name, in the order they were first declared.
#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct DependencySet {
    pub conda: IndexMap<String, DependencySpec>,
    pub pypi: IndexMap<String, DependencySpec>,
}

impl DependencySet {
    pub fn is_empty(&self) -> bool {
        self.conda.is_empty() && self.pypi.is_empty()
    }
}

/// Result of merging all conda environment files together.
#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct UnifiedManifest {
    pub channels: IndexSet<String>,
    /// Dependencies of the default environment.
    pub dependencies: DependencySet,
    /// Dependencies of each environment file, when converting them to separate features.
    pub features: IndexMap<String, DependencySet>,
}
