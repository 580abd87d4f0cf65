use serde::Deserialize;

/// Conda environment file, as documented in
/// <https://docs.conda.io/projects/conda/en/latest/user-guide/tasks/manage-environments.html#create-env-file-manually>.
///
/// Keys that have no pixi counterpart (e.g. `prefix`) are ignored.
#[derive(Default, Deserialize, Debug, Clone, Eq, PartialEq)]
pub struct CondaEnvironment {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub channels: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub dependencies: Vec<CondaDependency>,
}

/// Entry of the `dependencies` list, which is either a conda match spec, or a mapping holding
/// the requirements to install with pip.
#[derive(Deserialize, Debug, Clone, Eq, PartialEq)]
#[serde(untagged)]
pub enum CondaDependency {
    Spec(String),
    Pip(PipDependencies),
}

#[derive(Deserialize, Debug, Clone, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PipDependencies {
    pub pip: Vec<String>,
}

/// `channels:` and `dependencies:` left empty in a YAML file are deserialized as `null`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
