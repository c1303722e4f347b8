pub mod camera;
pub mod spatial;

pub use camera::{orbit_camera, setup_scene};
pub use spatial::{apply_picked, draw_links, picking, sync_nodes};
