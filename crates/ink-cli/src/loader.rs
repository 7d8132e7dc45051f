//! Template and shape loading from JSON files

use std::path::{Path, PathBuf};

use ink_core::{GenerationError, LevelTemplate, ShapeLibrary, ShapeTemplate, Side};
use strum::IntoEnumIterator;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("No shape files found under {0}")]
    NoShapes(PathBuf),
    #[error("Gave up after {attempts} attempts: {last}")]
    Exhausted {
        attempts: u32,
        last: GenerationError,
    },
}

/// Load a level template from a JSON file; missing fields take defaults
pub fn load_template<P: AsRef<Path>>(path: P) -> Result<LevelTemplate, CliError> {
    let content = std::fs::read_to_string(path)?;
    let template: LevelTemplate = serde_json::from_str(&content)?;
    template.validate()?;
    Ok(template)
}

/// Load one shape from a JSON file holding `{"name": ..., "rows": [...]}`
pub fn load_shape<P: AsRef<Path>>(path: P) -> Result<ShapeTemplate, CliError> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Load every shape under `dir`, laid out as `<dir>/<Side>/*.json`
///
/// Files are read in name order so a seed always sees the same library.
/// Missing side directories are skipped; generation reports them if that
/// side is ever needed.
pub fn load_shape_dir<P: AsRef<Path>>(dir: P) -> Result<ShapeLibrary, CliError> {
    let dir = dir.as_ref();
    let mut library = ShapeLibrary::new();

    for side in Side::iter() {
        let side_dir = dir.join(side.to_string());
        if !side_dir.is_dir() {
            tracing::debug!(%side, path = %side_dir.display(), "no shape directory");
            continue;
        }

        let mut files: Vec<PathBuf> = std::fs::read_dir(&side_dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        files.sort();

        for path in files {
            let shape = load_shape(&path)?;
            tracing::debug!(%side, shape = shape.name(), path = %path.display(), "loaded shape");
            library.add(side, shape);
        }
    }

    if library.is_empty() {
        return Err(CliError::NoShapes(dir.to_path_buf()));
    }
    Ok(library)
}
