//! Command line arguments and image discovery

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use clap::Parser;
use walkdir::WalkDir;

use picpick::TransferMode;

/// Extensions picked up when walking input directories
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "tif", "tiff", "webp"];

#[derive(Parser, Debug)]
#[command(name = "picpick", version, about = "Tag local pictures and sort them into folders")]
pub struct Cli {
    /// Image files, or directories to search for images
    #[arg(value_name = "INPUT")]
    pub inputs: Vec<PathBuf>,

    /// Project file to open before adding inputs
    #[arg(short, long, value_name = "FILE")]
    pub open: Option<PathBuf>,

    /// Tag to make available, may be repeated
    #[arg(short, long = "tag", value_name = "NAME")]
    pub tags: Vec<String>,

    /// Output directory for sorting, may be repeated
    #[arg(long = "output", value_name = "DIR", value_parser = dir_path)]
    pub outputs: Vec<PathBuf>,

    /// Copy images to their outputs instead of moving them
    #[arg(long)]
    pub copy: bool,

    /// Directory for the daily log files
    #[arg(long, value_name = "DIR", env = "PICPICK_LOG_DIR", default_value = ".logs")]
    pub log_dir: PathBuf,
}

impl Cli {
    pub fn transfer_mode(&self) -> TransferMode {
        if self.copy {
            TransferMode::Copy
        } else {
            TransferMode::Move
        }
    }
}

fn dir_path(value: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(value);
    if path.is_dir() {
        Ok(path)
    } else {
        Err(format!("\"{}\" is not a directory", value))
    }
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// Expand `inputs` into image files. Files given directly are taken as is,
/// directories are searched recursively for known image extensions.
pub fn collect_images(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut images = Vec::new();

    for input in inputs {
        if input.is_file() {
            images.push(input.clone());
        } else if input.is_dir() {
            for entry in WalkDir::new(input).sort_by_file_name() {
                let entry = entry?;
                if entry.file_type().is_file() && is_image(entry.path()) {
                    images.push(entry.into_path());
                }
            }
        } else {
            bail!("\"{}\" does not exist", input.display());
        }
    }

    tracing::debug!(count = images.len(), "Images collected from inputs");
    Ok(images)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_parse_repeated_arguments() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().to_str().unwrap();

        let cli = Cli::try_parse_from([
            "picpick", "a.jpg", "b.jpg", "--tag", "red", "-t", "blue", "--output", out, "--copy",
        ])
        .unwrap();

        assert_eq!(cli.inputs, [PathBuf::from("a.jpg"), PathBuf::from("b.jpg")]);
        assert_eq!(cli.tags, ["red", "blue"]);
        assert_eq!(cli.outputs, [dir.path().to_path_buf()]);
        assert_eq!(cli.transfer_mode(), TransferMode::Copy);
        assert_eq!(cli.open, None);
    }

    #[test]
    fn test_output_must_be_directory() {
        let result = Cli::try_parse_from(["picpick", "--output", "/definitely/not/here"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_collect_images_walks_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested");
        fs::create_dir(&nested).unwrap();
        fs::write(dir.path().join("b.JPG"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::write(nested.join("a.png"), "").unwrap();

        let images = collect_images(&[dir.path().to_path_buf()]).unwrap();

        assert_eq!(images.len(), 2);
        assert!(images.contains(&dir.path().join("b.JPG")));
        assert!(images.contains(&nested.join("a.png")));
    }

    #[test]
    fn test_collect_images_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        assert!(collect_images(&[dir.path().join("gone")]).is_err());
    }
}
