use std::path::PathBuf;

use gads_types::env_utils::env_nonempty;

/// Environment variable overriding the data directory.
pub const HOME_ENV: &str = "GADS_HOME";

#[derive(Debug, Clone)]
pub struct GadsPaths {
    base: PathBuf,
}

impl GadsPaths {
    pub fn from_base(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn base_dir(&self) -> PathBuf {
        self.base.clone()
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.base.join("logs").join("mcp")
    }
}

pub fn default_paths() -> GadsPaths {
    let base = env_nonempty(HOME_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".gads")
        });
    GadsPaths::from_base(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logs_dir_layout() {
        let paths = GadsPaths::from_base("/tmp/gads-home");
        assert_eq!(paths.logs_dir(), PathBuf::from("/tmp/gads-home/logs/mcp"));
        assert_eq!(paths.base_dir(), PathBuf::from("/tmp/gads-home"));
    }
}
