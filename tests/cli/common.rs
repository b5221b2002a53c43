use std::path::PathBuf;
use tempfile::TempDir;

/// Isolated working directory and home for one CLI run
pub struct TestContext {
    pub temp_dir: TempDir,
}

impl TestContext {
    pub fn new() -> Result<Self, std::io::Error> {
        let temp_dir = TempDir::new()?;
        Ok(TestContext { temp_dir })
    }

    pub fn temp_path(&self) -> PathBuf {
        self.temp_dir.path().to_path_buf()
    }

    /// Write `.slashdeck.toml` into the working directory
    pub fn write_config(&self, content: &str) -> Result<PathBuf, std::io::Error> {
        let path = self.temp_path().join(".slashdeck.toml");
        std::fs::write(&path, content)?;
        Ok(path)
    }

    /// Create a plugin directory holding the given manifests
    pub fn plugin_dir(&self, manifests: &[(&str, &str)]) -> Result<PathBuf, std::io::Error> {
        let dir = self.temp_path().join("plugins");
        std::fs::create_dir_all(&dir)?;
        for (name, content) in manifests {
            std::fs::write(dir.join(name), content)?;
        }
        Ok(dir)
    }

    /// Command running inside this context, with no colors and no
    /// inherited token
    #[allow(deprecated)]
    pub fn cmd(&self) -> assert_cmd::Command {
        let mut cmd =
            assert_cmd::Command::cargo_bin("slashdeck").expect("Failed to find slashdeck binary");
        cmd.current_dir(self.temp_path())
            .env("HOME", self.temp_path())
            .env("NO_COLOR", "1")
            .env_remove("SLASHDECK_TOKEN")
            .env_remove("RUST_LOG");
        cmd
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new().expect("Failed to create test context")
    }
}
