use bevy::prelude::*;

use crate::app::events::Picked;
use crate::app::resources::{NetRx, NetTx};
use crate::graph::GraphState;
use crate::util::config;

pub mod events;
pub mod resources;

pub struct RelGraphViewerPlugin;

impl Plugin for RelGraphViewerPlugin {
    fn build(&self, app: &mut App) {
        let cfg = config::load_or_default();
        let (tx, rx) = crossbeam_channel::unbounded();
        app.add_event::<Picked>()
            .insert_resource(GraphState::new(cfg))
            .insert_resource(NetTx(tx))
            .insert_resource(NetRx(rx))
            .add_systems(Startup, crate::render::setup_scene)
            .add_systems(
                Update,
                (
                    start_load,
                    pump_network,
                    crate::ui::ui_panel,
                    crate::ui::info_window,
                    crate::render::orbit_camera,
                    crate::render::picking,
                    crate::render::apply_picked,
                    crate::render::sync_nodes,
                    crate::render::draw_links,
                )
                    .chain(),
            );
    }
}

fn start_load(mut st: ResMut<GraphState>, tx: Res<NetTx>) {
    if !st.reload_requested {
        return;
    }
    st.reload_requested = false;
    let attempt = st.begin_attempt();
    info!(attempt, url = %st.cfg.loader.base_url, "loading graph");
    crate::net::spawn_loader(st.cfg.loader.clone(), attempt, tx.0.clone());
}

fn pump_network(mut st: ResMut<GraphState>, rx: Res<NetRx>) {
    for msg in rx.0.try_iter() {
        st.apply(msg);
    }
}
