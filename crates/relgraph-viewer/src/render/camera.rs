use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy_egui::EguiContexts;

use crate::app::resources::NodeAssets;
use crate::graph::GraphState;

const ROTATE_SPEED: f32 = 0.005;
const ZOOM_STEP: f32 = 0.1;

/// Orbit around `focus`; yaw and pitch are zero when looking down -Z.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct OrbitCamera {
    pub focus: Vec3,
    pub radius: f32,
    pub yaw: f32,
    pub pitch: f32,
    /// Pixels dragged since the left button went down; picking ignores drags.
    pub dragged: f32,
}

impl OrbitCamera {
    pub fn new(radius: f32) -> Self {
        Self {
            focus: Vec3::ZERO,
            radius: radius.max(0.5),
            yaw: 0.0,
            pitch: 0.0,
            dragged: 0.0,
        }
    }

    pub fn eye(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        self.focus + Vec3::new(self.radius * cp * sy, self.radius * sp, self.radius * cp * cy)
    }

    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.eye()).looking_at(self.focus, Vec3::Y)
    }

    pub fn rotate(&mut self, delta: Vec2) {
        self.yaw -= delta.x * ROTATE_SPEED;
        self.pitch = (self.pitch + delta.y * ROTATE_SPEED).clamp(-1.5, 1.5);
    }

    pub fn zoom(&mut self, lines: f32) {
        self.radius = (self.radius * (1.0 - lines * ZOOM_STEP)).clamp(0.5, 200.0);
    }
}

pub fn setup_scene(
    mut commands: Commands,
    st: Res<GraphState>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut mats: ResMut<Assets<StandardMaterial>>,
) {
    let mut unlit = |rgb: [f32; 3]| {
        mats.add(StandardMaterial {
            base_color: Color::srgb(rgb[0], rgb[1], rgb[2]),
            unlit: true,
            ..default()
        })
    };
    let assets = NodeAssets {
        sphere: meshes.add(Sphere::new(st.cfg.node_radius)),
        user: unlit(relgraph_core::ColorCategory::User.rgb_f32()),
        group: unlit(relgraph_core::ColorCategory::Group.rgb_f32()),
        other: unlit(relgraph_core::ColorCategory::Other.rgb_f32()),
        selected: unlit([1.0, 1.0, 0.0]),
    };
    commands.insert_resource(assets);

    let orbit = OrbitCamera::new(st.cfg.camera_distance);
    commands.spawn((
        Camera3dBundle {
            transform: orbit.transform(),
            ..default()
        },
        orbit,
    ));
}

pub fn orbit_camera(
    buttons: Res<ButtonInput<MouseButton>>,
    mut motion: EventReader<MouseMotion>,
    mut wheel: EventReader<MouseWheel>,
    mut contexts: EguiContexts,
    mut cam_q: Query<(&mut OrbitCamera, &mut Transform)>,
) {
    let delta: Vec2 = motion.read().map(|m| m.delta).sum();
    let scroll: f32 = wheel
        .read()
        .map(|w| match w.unit {
            MouseScrollUnit::Line => w.y,
            MouseScrollUnit::Pixel => w.y / 40.0,
        })
        .sum();

    let Ok((mut orbit, mut tf)) = cam_q.get_single_mut() else {
        return;
    };
    if buttons.just_pressed(MouseButton::Left) {
        orbit.dragged = 0.0;
    }
    if contexts.ctx_mut().wants_pointer_input() {
        return;
    }

    if buttons.pressed(MouseButton::Left) && delta != Vec2::ZERO {
        orbit.dragged += delta.length();
        orbit.rotate(delta);
    }
    if scroll != 0.0 {
        orbit.zoom(scroll);
    }
    *tf = orbit.transform();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_orbit_looks_down_negative_z() {
        let orbit = OrbitCamera::new(10.0);
        assert_eq!(orbit.eye(), Vec3::new(0.0, 0.0, 10.0));
    }

    #[test]
    fn zoom_and_pitch_are_clamped() {
        let mut orbit = OrbitCamera::new(10.0);
        for _ in 0..100 {
            orbit.zoom(5.0);
            orbit.rotate(Vec2::new(0.0, 1000.0));
        }
        assert_eq!(orbit.radius, 0.5);
        assert_eq!(orbit.pitch, 1.5);
        assert!((orbit.eye().length() - 0.5).abs() < 1e-4);
    }
}
