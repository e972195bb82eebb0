use std::path::PathBuf;

struct Uploaded {
    vertex_count: u32,
    index_count: u32,
    vertex_bytes: u64,
    index_bytes: u64,
    index_format: String,
}

pub async fn run(file: PathBuf) -> anyhow::Result<()> {
    let scene = super::load_scene(&file).await?;

    // Device setup blocks on the adapter, so keep it off the async workers.
    let uploaded = tokio::task::spawn_blocking(move || -> anyhow::Result<Vec<Uploaded>> {
        let (device, _queue) = dawn_wgpu::request_headless_device()?;
        let meshes = dawn_wgpu::upload_scene(&device, &scene)?;
        Ok(meshes
            .iter()
            .map(|m| Uploaded {
                vertex_count: m.vertex_count,
                index_count: m.index_count,
                vertex_bytes: m.vertex_buffer.size(),
                index_bytes: m.index_buffer.size(),
                index_format: format!("{:?}", m.index_format),
            })
            .collect())
    })
    .await??;

    for (i, m) in uploaded.iter().enumerate() {
        println!(
            "mesh {i}: {} vertices ({} bytes), {} {} indices ({} bytes)",
            m.vertex_count, m.vertex_bytes, m.index_count, m.index_format, m.index_bytes
        );
    }
    Ok(())
}
