use crate::errors::ConversionError;
use log::info;
use owo_colors::{OwoColorize, Stream};
use std::fmt::Debug;
#[cfg(unix)]
use std::fs::Permissions;
use std::io::Write;
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::Builder;

pub mod conda;

#[derive(Debug, PartialEq, Eq, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct ConverterOptions {
    pub inputs: Vec<PathBuf>,
    pub output: PathBuf,
    pub force: bool,
    pub dry_run: bool,
    pub workspace_name: Option<String>,
    pub platforms: Vec<String>,
    pub split_features: bool,
    pub wildcard_pins: bool,
}

/// Converts dependency declarations of another tool to a pixi manifest.
pub trait Converter: Debug {
    /// Performs the conversion, writing the resulting manifest to the output path.
    fn convert_to_pixi(&self) -> Result<(), ConversionError> {
        let manifest = self.build_pixi_manifest()?;
        let output = &self.get_converter_options().output;

        // The manifest goes to stdout, whatever the log level.
        if self.is_dry_run() {
            info!(
                "{}",
                format!("Converted {}:", output.display())
                    .if_supports_color(Stream::Stderr, |text| text.bold())
            );
            println!("{}", manifest.trim_end());
            return Ok(());
        }

        write_manifest(&manifest, output, self.get_converter_options().force)?;

        info!(
            "{}",
            format!(
                "Successfully converted {} to \"{}\"!",
                self.get_source_name(),
                output.display()
            )
            .if_supports_color(Stream::Stderr, |text| text.green())
        );

        Ok(())
    }

    /// Build the content of the pixi manifest.
    fn build_pixi_manifest(&self) -> Result<String, ConversionError>;

    /// Human-readable name of what is converted.
    fn get_source_name(&self) -> String;

    /// Get the options chosen by the user to perform the conversion.
    fn get_converter_options(&self) -> &ConverterOptions;

    /// Whether to print the manifest instead of writing it.
    fn is_dry_run(&self) -> bool {
        self.get_converter_options().dry_run
    }
}

/// Write the manifest to `destination`, refusing to replace an existing file unless `force` is
/// set. The manifest is first written to a temporary file next to the destination, which is then
/// moved in place, so a failed write never leaves a partial manifest behind. Without `force`, the
/// existence check and the move happen atomically.
pub fn write_manifest(
    manifest: &str,
    destination: &Path,
    force: bool,
) -> Result<(), ConversionError> {
    let write_error = |source| ConversionError::Write {
        path: destination.to_path_buf(),
        source,
    };

    let directory = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut builder = Builder::new();
    // Temporary files are only readable by their owner by default, unlike `File::create`.
    #[cfg(unix)]
    builder.permissions(Permissions::from_mode(0o666));

    let mut file = builder.tempfile_in(directory).map_err(write_error)?;
    file.write_all(manifest.as_bytes()).map_err(write_error)?;

    let persisted = if force {
        file.persist(destination)
    } else {
        file.persist_noclobber(destination)
    };

    persisted
        .map(|_| ())
        .map_err(|e| ConversionError::from_write(destination.to_path_buf(), e.error))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_write_manifest() {
        let tmp_dir = tempdir().unwrap();
        let output = tmp_dir.path().join("pixi.toml");

        write_manifest("[workspace]\n", &output, false).unwrap();

        assert_eq!(fs::read_to_string(&output).unwrap(), "[workspace]\n");
    }

    #[test]
    fn test_write_manifest_existing_file() {
        let tmp_dir = tempdir().unwrap();
        let output = tmp_dir.path().join("pixi.toml");
        fs::write(&output, "existing").unwrap();

        let result = write_manifest("[workspace]\n", &output, false);

        assert!(matches!(result, Err(ConversionError::AlreadyExists { path }) if path == output));
        assert_eq!(fs::read_to_string(&output).unwrap(), "existing");
    }

    #[test]
    fn test_write_manifest_existing_file_force() {
        let tmp_dir = tempdir().unwrap();
        let output = tmp_dir.path().join("pixi.toml");
        fs::write(&output, "a much longer existing content").unwrap();

        write_manifest("[workspace]\n", &output, true).unwrap();

        assert_eq!(fs::read_to_string(&output).unwrap(), "[workspace]\n");
    }

    #[test]
    fn test_write_manifest_failed_replace_keeps_destination() {
        let tmp_dir = tempdir().unwrap();
        // A non-empty directory cannot be replaced by the manifest.
        let output = tmp_dir.path().join("pixi.toml");
        fs::create_dir(&output).unwrap();
        fs::write(output.join("existing.toml"), "existing").unwrap();

        assert!(matches!(
            write_manifest("[workspace]\n", &output, true),
            Err(ConversionError::Write { path, .. }) if path == output
        ));
        assert_eq!(
            fs::read_to_string(output.join("existing.toml")).unwrap(),
            "existing"
        );
        // The temporary file is removed.
        assert_eq!(fs::read_dir(tmp_dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_write_manifest_missing_directory() {
        let tmp_dir = tempdir().unwrap();
        let output = tmp_dir.path().join("missing").join("pixi.toml");

        assert!(matches!(
            write_manifest("[workspace]\n", &output, false),
            Err(ConversionError::Write { .. })
        ));
    }
}
