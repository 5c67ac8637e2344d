use anyhow::Result;
use std::env;
use std::path::PathBuf;

const DEFAULT_DATA_DIR: &str = "web/data";
const STATS_FILE: &str = "stats.json";
const FILES_FILE: &str = "files.json";

pub fn data_root() -> Result<PathBuf> {
    if let Ok(override_dir) = env::var("MVIZ_DATA_DIR") {
        return Ok(PathBuf::from(override_dir));
    }

    Ok(PathBuf::from(DEFAULT_DATA_DIR))
}

pub fn stats_path() -> Result<PathBuf> {
    Ok(data_root()?.join(STATS_FILE))
}

pub fn files_path() -> Result<PathBuf> {
    Ok(data_root()?.join(FILES_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_override_wins() {
        unsafe {
            env::set_var("MVIZ_DATA_DIR", "/tmp/mviz-data");
        }
        let stats = stats_path().expect("stats path");
        let files = files_path().expect("files path");
        assert_eq!(stats, PathBuf::from("/tmp/mviz-data").join("stats.json"));
        assert_eq!(files, PathBuf::from("/tmp/mviz-data").join("files.json"));
        unsafe {
            env::remove_var("MVIZ_DATA_DIR");
        }
    }
}
