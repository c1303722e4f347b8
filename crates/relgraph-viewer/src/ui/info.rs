use bevy::prelude::ResMut;
use bevy_egui::{egui, EguiContexts};

use crate::graph::GraphState;

pub fn info_window(mut contexts: EguiContexts, mut st: ResMut<GraphState>) {
    let Some(info) = st.selected_info() else {
        return;
    };

    let mut open = true;
    egui::Window::new("Node Info")
        .open(&mut open)
        .resizable(true)
        .show(contexts.ctx_mut(), |ui| {
            egui::Grid::new("node_info").num_columns(2).striped(true).show(ui, |ui| {
                for (key, value) in [
                    ("ID", &info.id),
                    ("Label", &info.label),
                    ("Screen Name", &info.screen_name),
                    ("Name", &info.name),
                    ("City", &info.city),
                ] {
                    ui.label(key);
                    ui.label(value.as_str());
                    ui.end_row();
                }
            });

            ui.separator();
            ui.label("Relations:");
            if info.relations.is_empty() {
                ui.label("No relations available");
            } else {
                for line in info.relation_lines() {
                    ui.label(line);
                }
            }

            if !info.attributes.is_empty() {
                ui.separator();
                ui.collapsing("Attributes", |ui| {
                    for (key, value) in &info.attributes {
                        ui.label(format!("{key}: {value}"));
                    }
                });
            }
        });

    if !open {
        st.clear_selection();
    }
}
