use std::path::PathBuf;

use anyhow::Context;
use dawn_scene::{decode_file, resolve, Object, Scene};
use glam::Vec3;

pub async fn run(file: PathBuf, tree: bool) -> anyhow::Result<()> {
    let data = super::read_file(&file).await?;
    let decoded =
        decode_file(&data).with_context(|| format!("failed to decode {}", file.display()))?;

    println!("{}", file.display());
    println!(
        "  version {}, {} content bytes",
        decoded.header.version, decoded.header.content_byte_count
    );
    println!("  chunks:");
    for chunk in &decoded.chunks {
        let note = if chunk.tag.is_known() { "" } else { " (skipped)" };
        println!(
            "    {:<4} at {:>8}  {:>8} bytes{}",
            chunk.tag, chunk.offset, chunk.byte_count, note
        );
    }

    let r = &decoded.records;
    println!(
        "  {} buffers, {} accessors, {} vertex layouts, {} meshes, {} objects, {} transform nodes",
        r.buffers.len(),
        r.accessors.len(),
        r.vertex_layouts.len(),
        r.meshes.len(),
        r.objects.len(),
        r.transform_nodes.len()
    );

    let scene = resolve(decoded.records)
        .with_context(|| format!("failed to resolve {}", file.display()))?;
    println!("  {} root nodes", scene.roots().len());

    if tree {
        print_tree(&scene);
    }
    Ok(())
}

fn print_tree(scene: &Scene) {
    println!("  tree:");
    for id in scene.depth_first() {
        let node = scene.node(id);
        let world = scene.world_matrix(id).transform_point3(Vec3::ZERO);
        let content = match node.object.as_ref() {
            Object::Mesh(mesh) => format!(
                "mesh ({} vertices, {} indices)",
                mesh.vertex_count(),
                mesh.index_count()
            ),
        };
        println!(
            "    {:indent$}{id} {content} at ({:.3}, {:.3}, {:.3})",
            "",
            world.x,
            world.y,
            world.z,
            indent = scene.depth(id) * 2
        );
    }
}
