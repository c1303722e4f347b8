use bevy::prelude::{Resource, Vec2};
use relgraph_core::{Graph, LayoutEngine, NodeId, NodeInfo};
use relgraph_loader::{layout_engine, LoadStats};

use crate::net::{Incoming, IncomingKind};
use crate::util::config::ViewerConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Idle,
    Loading,
    Ready,
    Failed(String),
}

/// Everything the viewer knows about the current graph. Owned by the app as
/// a resource and passed to systems explicitly.
#[derive(Resource)]
pub struct GraphState {
    pub cfg: ViewerConfig,
    pub graph: Graph,
    pub engine: LayoutEngine,
    pub status: LoadStatus,
    pub stats: Option<LoadStats>,
    pub selected: Option<NodeId>,
    pub attempt: u64,
    pub reload_requested: bool,
    pub needs_redraw: bool,
    pub notice: Option<String>,
}

impl GraphState {
    pub fn new(cfg: ViewerConfig) -> Self {
        let engine = layout_engine(&cfg.loader);
        Self {
            cfg,
            graph: Graph::default(),
            engine,
            status: LoadStatus::Idle,
            stats: None,
            selected: None,
            attempt: 0,
            reload_requested: true,
            needs_redraw: true,
            notice: None,
        }
    }

    pub fn begin_attempt(&mut self) -> u64 {
        self.attempt += 1;
        self.status = LoadStatus::Loading;
        self.attempt
    }

    pub fn apply(&mut self, msg: Incoming) {
        if msg.attempt != self.attempt {
            tracing::debug!(
                attempt = msg.attempt,
                current = self.attempt,
                "dropping stale load result"
            );
            return;
        }
        match msg.kind {
            IncomingKind::Loaded(loaded) => {
                let loaded = *loaded;
                self.graph = loaded.graph;
                self.stats = Some(loaded.stats);
                self.status = LoadStatus::Ready;
            }
            IncomingKind::Failed(err) => {
                tracing::error!(attempt = msg.attempt, error = %err, "failed to load graph");
                self.graph = Graph::default();
                self.stats = None;
                self.status = LoadStatus::Failed(err);
            }
        }
        self.selected = None;
        self.needs_redraw = true;
    }

    pub fn select(&mut self, id: NodeId) {
        if self.graph.contains(&id) && self.selected.as_ref() != Some(&id) {
            self.selected = Some(id);
            self.needs_redraw = true;
        }
    }

    pub fn clear_selection(&mut self) {
        if self.selected.take().is_some() {
            self.needs_redraw = true;
        }
    }

    pub fn selected_info(&self) -> Option<NodeInfo> {
        let id = self.selected.as_ref()?;
        self.graph.node(id).map(NodeInfo::from_node)
    }

    fn sync_params(&mut self) {
        self.engine.set_params(self.cfg.loader.layout);
    }

    /// One more relaxation step on the current positions.
    pub fn relax_once(&mut self) {
        self.sync_params();
        self.engine.relax(&mut self.graph);
        self.needs_redraw = true;
    }

    /// Fresh scatter followed by the configured number of passes.
    pub fn relayout(&mut self) {
        self.sync_params();
        self.engine.run(&mut self.graph, self.cfg.loader.passes);
        self.needs_redraw = true;
    }
}

/// Closest candidate to `cursor` within `radius` screen pixels.
pub fn nearest_on_screen<I>(candidates: I, cursor: Vec2, radius: f32) -> Option<NodeId>
where
    I: IntoIterator<Item = (NodeId, Vec2)>,
{
    let mut best: Option<(f32, NodeId)> = None;
    for (id, screen) in candidates {
        let d = screen.distance(cursor);
        if d < radius && best.as_ref().map(|(bd, _)| d < *bd).unwrap_or(true) {
            best = Some((d, id));
        }
    }
    best.map(|(_, id)| id)
}
