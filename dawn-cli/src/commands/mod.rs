pub mod inspect;
pub mod sample;
pub mod transcode;
pub mod upload;

use std::path::Path;

use anyhow::{Context, Result};
use dawn_scene::Scene;

pub async fn read_file(path: &Path) -> Result<Vec<u8>> {
    tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))
}

pub async fn load_scene(path: &Path) -> Result<Scene> {
    let data = read_file(path).await?;
    dawn_scene::deserialize(&data).with_context(|| format!("failed to load {}", path.display()))
}
