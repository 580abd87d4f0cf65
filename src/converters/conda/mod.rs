mod dependencies;
mod pypi;

use crate::converters::{Converter, ConverterOptions};
use crate::discovery::discover;
use crate::errors::ConversionError;
use crate::schema::conda::{CondaDependency, CondaEnvironment};
use crate::schema::pixi::{DependencySpec, UnifiedManifest};
use crate::toml::{Workspace, render};
use crate::utils::normalize_environment_name;
use indexmap::IndexMap;
use log::{debug, warn};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_WORKSPACE_NAME: &str = "workspace";

#[derive(Debug, PartialEq, Eq)]
pub struct Conda {
    pub converter_options: ConverterOptions,
}

impl Converter for Conda {
    fn build_pixi_manifest(&self) -> Result<String, ConversionError> {
        let files = discover(&self.converter_options.inputs)?;

        let environments = files
            .into_iter()
            .map(|path| {
                let environment = load(&path)?;
                Ok(EnvironmentFile { path, environment })
            })
            .collect::<Result<Vec<EnvironmentFile>, ConversionError>>()?;

        let manifest = merge(
            &environments,
            self.converter_options.split_features,
            self.converter_options.wildcard_pins,
        )?;

        let workspace = Workspace {
            name: self.get_workspace_name(),
            platforms: self.converter_options.platforms.clone(),
        };

        Ok(render(&manifest, &workspace))
    }

    fn get_source_name(&self) -> String {
        "conda environments".to_string()
    }

    fn get_converter_options(&self) -> &ConverterOptions {
        &self.converter_options
    }
}

impl Conda {
    /// Workspace name explicitly set by the user, or the name of the current directory.
    fn get_workspace_name(&self) -> String {
        if let Some(name) = &self.converter_options.workspace_name {
            return name.clone();
        }

        env::current_dir()
            .ok()
            .and_then(|path| {
                path.file_name()
                    .map(|name| name.to_string_lossy().to_string())
            })
            .unwrap_or_else(|| {
                debug!("Could not determine the current directory name, using \"{DEFAULT_WORKSPACE_NAME}\" as workspace name.");
                DEFAULT_WORKSPACE_NAME.to_string()
            })
    }
}

/// Conda environment, along with the file it was read from.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct EnvironmentFile {
    pub path: PathBuf,
    pub environment: CondaEnvironment,
}

impl EnvironmentFile {
    /// Name of the feature holding the dependencies of the environment, which is the name of
    /// the environment, or the name of the file if it has none.
    fn feature_name(&self) -> String {
        let name = self.environment.name.clone().unwrap_or_else(|| {
            self.path
                .file_stem()
                .map(|stem| stem.to_string_lossy().to_string())
                .unwrap_or_default()
        });

        normalize_environment_name(&name)
    }
}

/// Read and parse a conda environment file.
pub fn load(path: &Path) -> Result<CondaEnvironment, ConversionError> {
    debug!("Reading \"{}\"...", path.display());

    let content =
        fs::read_to_string(path).map_err(|e| ConversionError::from_read(path.to_path_buf(), e))?;

    // An environment file without any key is valid for conda, but is not a YAML mapping.
    if content.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#') || line == "---"
    }) {
        return Ok(CondaEnvironment::default());
    }

    serde_yaml::from_str(&content).map_err(|e| ConversionError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Merge conda environments together, in order. Channels are deduplicated, keeping the order in
/// which they first appear. Dependencies are deduplicated on their name, the last declaration of
/// a dependency taking precedence over the previous ones.
///
/// If `split_features` is set, dependencies of each environment are kept in a separate feature,
/// instead of being merged in the default one.
pub fn merge(
    environments: &[EnvironmentFile],
    split_features: bool,
    wildcard_pins: bool,
) -> Result<UnifiedManifest, ConversionError> {
    let mut manifest = UnifiedManifest::default();

    for environment_file in environments {
        let EnvironmentFile { path, environment } = environment_file;

        manifest
            .channels
            .extend(environment.channels.iter().map(|c| c.trim().to_string()));

        let dependency_set = if split_features {
            manifest
                .features
                .entry(environment_file.feature_name())
                .or_default()
        } else {
            &mut manifest.dependencies
        };

        for dependency in &environment.dependencies {
            match dependency {
                CondaDependency::Spec(spec) => {
                    let (name, dependency_spec) = dependencies::parse(spec, wildcard_pins)
                        .map_err(|reason| ConversionError::InvalidSpec {
                            path: path.clone(),
                            spec: spec.clone(),
                            reason,
                        })?;
                    insert(&mut dependency_set.conda, name, dependency_spec, path);
                }
                CondaDependency::Pip(pip) => {
                    for requirement in &pip.pip {
                        match pypi::parse(requirement) {
                            Ok((name, dependency_spec)) => {
                                insert(&mut dependency_set.pypi, name, dependency_spec, path);
                            }
                            Err(reason) => warn!(
                                "Skipping pip requirement \"{requirement}\" from \"{}\": {reason}.",
                                path.display()
                            ),
                        }
                    }
                }
            }
        }
    }

    Ok(manifest)
}

/// Insert a dependency, replacing a previous declaration of the same package in place, so that
/// the dependency keeps the position of its first declaration.
fn insert(
    dependencies: &mut IndexMap<String, DependencySpec>,
    name: String,
    dependency_spec: DependencySpec,
    path: &Path,
) {
    if dependencies
        .get(&name)
        .is_some_and(|previous| previous != &dependency_spec)
    {
        warn!(
            "\"{name}\" is declared several times with different requirements, keeping the one from \"{}\".",
            path.display()
        );
    }

    dependencies.insert(name, dependency_spec);
}
