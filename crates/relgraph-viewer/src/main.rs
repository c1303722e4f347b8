mod app;
mod graph;
mod net;
mod render;
mod ui;
mod util;

use bevy::prelude::*;
use bevy_egui::EguiPlugin;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "relgraph".into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(EguiPlugin)
        .insert_resource(ClearColor(Color::BLACK))
        .add_plugins(app::RelGraphViewerPlugin)
        .run();
}
