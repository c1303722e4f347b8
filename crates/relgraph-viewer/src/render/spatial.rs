use bevy::prelude::*;
use bevy_egui::EguiContexts;

use crate::app::events::Picked;
use crate::app::resources::NodeAssets;
use crate::graph::{nearest_on_screen, GraphState};
use crate::render::camera::OrbitCamera;

/// Renderable handle for a graph node; the node itself lives in
/// [`GraphState`] and is found again by id.
#[derive(Component)]
pub struct NodeMarker {
    pub id: relgraph_core::NodeId,
}

const LINK_COLOR: u8 = 0xaa;
const CLICK_SLOP_PX: f32 = 4.0;

pub fn picking(
    buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window>,
    cam_q: Query<(&Camera, &GlobalTransform, &OrbitCamera)>,
    markers: Query<(&NodeMarker, &GlobalTransform)>,
    mut contexts: EguiContexts,
    st: Res<GraphState>,
    mut out: EventWriter<Picked>,
) {
    if !buttons.just_released(MouseButton::Left) {
        return;
    }
    if contexts.ctx_mut().wants_pointer_input() {
        return;
    }
    let Ok(window) = windows.get_single() else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        return;
    };
    let Ok((camera, cam_tf, orbit)) = cam_q.get_single() else {
        return;
    };
    if orbit.dragged > CLICK_SLOP_PX {
        return;
    }

    let candidates = markers.iter().filter_map(|(marker, tf)| {
        let screen = camera.world_to_viewport(cam_tf, tf.translation())?;
        Some((marker.id.clone(), screen))
    });
    if let Some(picked) = nearest_on_screen(candidates, cursor, st.cfg.pick_radius_px) {
        out.send(Picked(picked));
    }
}

pub fn apply_picked(mut st: ResMut<GraphState>, mut ev: EventReader<Picked>) {
    for Picked(id) in ev.read() {
        debug!(id = %id, "node picked");
        st.select(id.clone());
    }
}

pub fn sync_nodes(
    mut commands: Commands,
    mut st: ResMut<GraphState>,
    assets: Res<NodeAssets>,
    query: Query<Entity, With<NodeMarker>>,
) {
    if !st.needs_redraw {
        return;
    }
    st.needs_redraw = false;

    for e in query.iter() {
        commands.entity(e).despawn_recursive();
    }

    for node in st.graph.nodes() {
        let material = if st.selected.as_ref() == Some(&node.id) {
            assets.selected.clone()
        } else {
            assets.material(node.category())
        };
        commands.spawn((
            PbrBundle {
                mesh: assets.sphere.clone(),
                material,
                transform: Transform::from_translation(node.position),
                ..default()
            },
            NodeMarker {
                id: node.id.clone(),
            },
        ));
    }
}

pub fn draw_links(st: Res<GraphState>, mut gizmos: Gizmos) {
    if !st.cfg.show_links {
        return;
    }
    let color = Color::srgb_u8(LINK_COLOR, LINK_COLOR, LINK_COLOR);
    for (a, b) in st.graph.resolved_links() {
        gizmos.line(a.position, b.position, color);
    }
}
