use std::env;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::filters::City;

/// Runtime settings.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the city CSV files.
    pub data_dir: PathBuf,
}

impl Config {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Use the executable's directory when it holds any city file,
    /// otherwise the current working directory.
    pub fn locate() -> Result<Self> {
        let cwd = env::current_dir()?;
        let exe_dir = env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(Path::to_path_buf));

        let data_dir = match exe_dir {
            Some(dir) if has_city_files(&dir) => dir,
            _ => cwd,
        };
        tracing::info!(data_dir = %data_dir.display(), "resolved data directory");
        Ok(Self { data_dir })
    }
}

fn has_city_files(dir: &Path) -> bool {
    City::ALL
        .iter()
        .any(|city| dir.join(city.file_name()).is_file())
}
