use bevy::prelude::ResMut;
use bevy_egui::{egui, EguiContexts};
use relgraph_core::LayoutUpdate;

use crate::graph::{GraphState, LoadStatus};
use crate::util::config;

pub fn ui_panel(mut contexts: EguiContexts, mut st: ResMut<GraphState>) {
    egui::SidePanel::left("left").show(contexts.ctx_mut(), |ui| {
        ui.heading("relgraph");
        ui.label(format!("source: {}", st.cfg.loader.base_url));
        match &st.status {
            LoadStatus::Idle => ui.label("idle"),
            LoadStatus::Loading => ui.label("loading…"),
            LoadStatus::Ready => ui.label("ready"),
            LoadStatus::Failed(err) => {
                ui.colored_label(egui::Color32::LIGHT_RED, format!("load failed: {err}"))
            }
        };
        ui.label(format!("nodes: {}", st.graph.len()));
        ui.label(format!("links: {}", st.graph.links().len()));
        if let Some(stats) = st.stats {
            ui.label(format!(
                "{} records in {} ms",
                stats.records,
                stats.elapsed.as_millis()
            ));
        }

        let loading = st.status == LoadStatus::Loading;
        if ui
            .add_enabled(!loading, egui::Button::new("Reload"))
            .clicked()
        {
            st.reload_requested = true;
        }

        ui.add_space(8.0);
        ui.separator();
        ui.heading("Fetch");
        ui.add(egui::Slider::new(&mut st.cfg.loader.concurrency, 1..=64).text("concurrency"));

        ui.add_space(8.0);
        ui.separator();
        ui.heading("Layout");
        let mut params = st.cfg.loader.layout;
        ui.add(egui::Slider::new(&mut params.max_distance, 0.5..=20.0).text("max distance"));
        ui.add(egui::Slider::new(&mut params.repulsion_factor, 0.0..=2.0).text("repulsion"));
        ui.add(egui::Slider::new(&mut params.attraction_factor, 0.0..=1.0).text("attraction"));
        ui.horizontal(|ui| {
            ui.radio_value(&mut params.update, LayoutUpdate::InPlace, "in place");
            ui.radio_value(&mut params.update, LayoutUpdate::Simultaneous, "simultaneous");
        });
        if params != st.cfg.loader.layout {
            st.cfg.loader.layout = params;
        }
        ui.add(egui::Slider::new(&mut st.cfg.loader.passes, 0..=20).text("passes"));
        ui.horizontal(|ui| {
            if ui.button("Relax").clicked() {
                st.relax_once();
            }
            if ui.button("Re-layout").clicked() {
                st.relayout();
            }
        });

        ui.add_space(8.0);
        ui.checkbox(&mut st.cfg.show_links, "Links");

        ui.add_space(8.0);
        ui.separator();
        if ui.button("Save settings").clicked() {
            let notice = match config::save(&st.cfg) {
                Ok(()) => "settings saved".to_string(),
                Err(e) => format!("{e:#}"),
            };
            st.notice = Some(notice);
        }
        if let Some(notice) = &st.notice {
            ui.small(notice.as_str());
        }
    });
}
