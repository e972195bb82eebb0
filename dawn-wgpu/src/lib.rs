//! wgpu side of DWNSCENE loading: vertex layout, buffer creation and a
//! headless device for tools.

mod device;
mod layout;
mod mesh;

pub use device::request_headless_device;
pub use layout::{surface_vertex_layout, wgpu_index_format, SURFACE_VERTEX_ATTRIBUTES};
pub use mesh::{buffer_usages, upload_scene, GpuMesh, WgpuBufferFactory};
