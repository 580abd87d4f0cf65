use crate::schema::pixi::{DependencySet, DependencySpec, UnifiedManifest};
use indexmap::IndexMap;
use toml_edit::{Array, DocumentMut, Item, Table, value};

const DEFAULT_CHANNEL: &str = "conda-forge";

/// Metadata of the `[workspace]` table that does not come from conda environments.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Workspace {
    pub name: String,
    pub platforms: Vec<String>,
}

/// Render the merged conda environments as a pixi manifest.
///
/// <https://pixi.sh/latest/reference/pixi_manifest/>
pub fn render(manifest: &UnifiedManifest, workspace: &Workspace) -> String {
    let mut document = DocumentMut::new();

    let mut workspace_table = Table::new();
    workspace_table["name"] = value(workspace.name.as_str());
    workspace_table["channels"] = value(if manifest.channels.is_empty() {
        Array::from_iter([DEFAULT_CHANNEL])
    } else {
        Array::from_iter(&manifest.channels)
    });
    workspace_table["platforms"] = value(Array::from_iter(&workspace.platforms));
    document["workspace"] = Item::Table(workspace_table);

    if manifest.features.is_empty() {
        insert_dependency_set(document.as_table_mut(), &manifest.dependencies, true);
    } else {
        // Dependencies outside of features are only present if the manifest was built by hand.
        if !manifest.dependencies.is_empty() {
            insert_dependency_set(document.as_table_mut(), &manifest.dependencies, false);
        }

        let mut environments = Table::new();
        for name in manifest.features.keys() {
            environments[name.as_str()] = value(Array::from_iter([name.as_str()]));
        }
        document["environments"] = Item::Table(environments);

        let mut features = Table::new();
        features.set_implicit(true);

        for (name, dependency_set) in &manifest.features {
            let mut feature = Table::new();
            feature.set_implicit(true);
            // An environment cannot refer to a feature that does not exist.
            insert_dependency_set(&mut feature, dependency_set, dependency_set.is_empty());
            features[name.as_str()] = Item::Table(feature);
        }
        document["feature"] = Item::Table(features);
    }

    document.to_string()
}

fn insert_dependency_set(table: &mut Table, dependency_set: &DependencySet, always_conda: bool) {
    if always_conda || !dependency_set.conda.is_empty() {
        table["dependencies"] = Item::Table(dependencies_table(&dependency_set.conda));
    }
    if !dependency_set.pypi.is_empty() {
        table["pypi-dependencies"] = Item::Table(dependencies_table(&dependency_set.pypi));
    }
}

fn dependencies_table(dependencies: &IndexMap<String, DependencySpec>) -> Table {
    let mut table = Table::new();

    for (name, dependency_spec) in dependencies {
        table[name.as_str()] = value(dependency_spec.to_toml_value());
    }

    table
}
