//! Shared helpers for the integration tests

#![allow(dead_code)]

use std::path::PathBuf;

use bindery::{Prerequisite, Runtime, CONFIG_FILE};
use tempfile::TempDir;

/// A runtime opened from a config file in a temporary directory
pub struct TestRuntime {
    pub runtime: Runtime,
    pub config_path: PathBuf,
    _dir: TempDir,
}

impl TestRuntime {
    /// Write `config` to a fresh directory and open a runtime over it
    pub fn with_config(config: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join(CONFIG_FILE);
        std::fs::write(&config_path, config).unwrap();
        let runtime = Runtime::open(dir.path()).unwrap();
        TestRuntime {
            runtime,
            config_path,
            _dir: dir,
        }
    }

    /// Replace the config file and reload it
    pub fn rewrite(&self, config: &str) -> bindery::ApplySummary {
        std::fs::write(&self.config_path, config).unwrap();
        self.runtime.reload(&self.config_path).unwrap()
    }
}

pub struct JdbcDriver;
impl Prerequisite for JdbcDriver {
    fn type_name(&self) -> &'static str {
        "jdbcDriver"
    }
}

pub struct Messaging;
impl Prerequisite for Messaging {
    fn type_name(&self) -> &'static str {
        "messaging"
    }
}
