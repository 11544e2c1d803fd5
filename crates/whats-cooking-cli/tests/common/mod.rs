//! Shared fixtures for CLI integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;
use whats_cooking_core::{ModelMetadata, ModelScale};
use whats_cooking_test_support::{write_model_artifact, SyntheticImageBuilder, FOOD_LABELS};

/// A temp directory holding a small model artifact and a few photos.
///
/// Commands run with the directory as cwd and an empty XDG config home, so
/// the developer's own config files never leak into a test.
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let metadata = ModelMetadata::new(ModelScale::N, 32, FOOD_LABELS.iter().copied());
        write_model_artifact(&dir.path().join("model"), &metadata).unwrap();
        std::fs::create_dir_all(dir.path().join("xdg")).unwrap();
        Self { dir }
    }

    /// Adds the two photos used by the batch scenarios.
    pub fn with_photos(self) -> Self {
        self.photo("a.jpg");
        self.photo("b.jpg");
        self
    }

    pub fn photo(&self, name: &str) -> PathBuf {
        let path = self.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        SyntheticImageBuilder::save(&SyntheticImageBuilder::gradient(64, 48), &path);
        path
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn model_dir(&self) -> PathBuf {
        self.path().join("model")
    }

    pub fn write_config(&self, content: &str) {
        std::fs::write(self.path().join(".whats-cooking.toml"), content).unwrap();
    }

    /// The binary, isolated from user config, without a model dir flag.
    pub fn bare_cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("whats-cooking").unwrap();
        cmd.current_dir(self.path())
            .env("XDG_CONFIG_HOME", self.path().join("xdg"))
            .env_remove("RUST_LOG");
        cmd
    }

    /// The binary pointed at the fixture model.
    pub fn cmd(&self) -> Command {
        let mut cmd = self.bare_cmd();
        cmd.arg("--model-dir").arg(self.model_dir());
        cmd
    }
}

pub fn jpeg_bytes() -> Vec<u8> {
    SyntheticImageBuilder::encode(
        &SyntheticImageBuilder::checkerboard(40, 40, 5),
        image::ImageFormat::Jpeg,
    )
}
