use crate::errors::ConversionError;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

const YAML_EXTENSIONS: [&str; 2] = ["yml", "yaml"];

/// Expands the paths passed on the command line into the list of conda environment files to
/// convert.
///
/// Files are kept as-is, in the order they were passed, without checking that they exist, as a
/// missing file is reported when reading it. Directories are replaced, at their position, by the
/// `*.yml` and `*.yaml` files they directly contain, sorted by file name.
pub fn discover(paths: &[PathBuf]) -> Result<Vec<PathBuf>, ConversionError> {
    let mut files: Vec<PathBuf> = Vec::new();

    for path in paths {
        if path.is_dir() {
            let found = list_environment_files(path)?;
            debug!(
                "Found {} environment file(s) in \"{}\".",
                found.len(),
                path.display()
            );
            files.extend(found);
        } else {
            files.push(path.clone());
        }
    }

    if files.is_empty() {
        return Err(ConversionError::NoInputFiles);
    }

    Ok(files)
}

fn list_environment_files(directory: &Path) -> Result<Vec<PathBuf>, ConversionError> {
    let entries = fs::read_dir(directory)
        .map_err(|e| ConversionError::from_read(directory.to_path_buf(), e))?;

    let mut files: Vec<PathBuf> = Vec::new();

    for entry in entries {
        let path = entry
            .map_err(|e| ConversionError::from_read(directory.to_path_buf(), e))?
            .path();

        if path.is_file() && is_yaml(&path) {
            files.push(path);
        }
    }

    files.sort_unstable();

    Ok(files)
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| YAML_EXTENSIONS.contains(&extension))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn test_discover_directory() {
        let tmp_dir = tempdir().unwrap();
        let project_path = tmp_dir.path();

        for file in ["y.yaml", "x.yml", "readme.md", "environment.yml.bak"] {
            File::create(project_path.join(file)).unwrap();
        }
        fs::create_dir(project_path.join("nested.yml")).unwrap();

        assert_eq!(
            discover(&[project_path.to_path_buf()]).unwrap(),
            vec![project_path.join("x.yml"), project_path.join("y.yaml")]
        );
    }

    #[test]
    fn test_discover_keeps_input_order() {
        let tmp_dir = tempdir().unwrap();
        let project_path = tmp_dir.path();
        let environments_path = project_path.join("environments");

        fs::create_dir(&environments_path).unwrap();
        File::create(environments_path.join("b.yml")).unwrap();
        File::create(environments_path.join("a.yml")).unwrap();

        let paths = vec![
            PathBuf::from("last.yml"),
            environments_path.clone(),
            PathBuf::from("first.yaml"),
        ];

        assert_eq!(
            discover(&paths).unwrap(),
            vec![
                PathBuf::from("last.yml"),
                environments_path.join("a.yml"),
                environments_path.join("b.yml"),
                PathBuf::from("first.yaml"),
            ]
        );
    }

    #[rstest]
    #[case("missing.yml")]
    #[case("environment.txt")]
    fn test_discover_does_not_check_files(#[case] file: &str) {
        assert_eq!(
            discover(&[PathBuf::from(file)]).unwrap(),
            vec![PathBuf::from(file)]
        );
    }

    #[test]
    fn test_discover_empty_directory() {
        let tmp_dir = tempdir().unwrap();
        File::create(tmp_dir.path().join("readme.md")).unwrap();

        assert!(matches!(
            discover(&[tmp_dir.path().to_path_buf()]),
            Err(ConversionError::NoInputFiles)
        ));
    }
}
