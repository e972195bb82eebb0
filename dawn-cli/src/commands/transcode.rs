use std::path::PathBuf;

use anyhow::Context;
use dawn_scene::MeshUpload;

pub async fn run(file: PathBuf, output: PathBuf) -> anyhow::Result<()> {
    let scene = super::load_scene(&file).await?;

    tokio::fs::create_dir_all(&output)
        .await
        .with_context(|| format!("failed to create {}", output.display()))?;

    for (i, mesh) in scene.meshes().iter().enumerate() {
        let upload = MeshUpload::from_mesh(mesh).with_context(|| format!("mesh {i}"))?;

        let vtx = output.join(format!("mesh_{i}.vtx"));
        let idx = output.join(format!("mesh_{i}.idx"));
        tokio::fs::write(&vtx, &upload.vertices.content)
            .await
            .with_context(|| format!("failed to write {}", vtx.display()))?;
        tokio::fs::write(&idx, &upload.indices.content)
            .await
            .with_context(|| format!("failed to write {}", idx.display()))?;

        println!(
            "mesh {i}: {} vertices -> {}, {} {:?} indices -> {}",
            upload.vertex_count,
            vtx.display(),
            upload.index_count,
            upload.index_format,
            idx.display()
        );
    }
    Ok(())
}
