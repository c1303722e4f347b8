use relgraph_loader::Loaded;

/// Message from a loader thread back to the app. `attempt` lets the app drop
/// results of loads that were superseded by a reload.
#[derive(Debug)]
pub struct Incoming {
    pub attempt: u64,
    pub kind: IncomingKind,
}

#[derive(Debug)]
pub enum IncomingKind {
    Loaded(Box<Loaded>),
    Failed(String),
}

impl Incoming {
    pub fn loaded(attempt: u64, loaded: Loaded) -> Self {
        Self {
            attempt,
            kind: IncomingKind::Loaded(Box::new(loaded)),
        }
    }

    pub fn failed(attempt: u64, msg: String) -> Self {
        Self {
            attempt,
            kind: IncomingKind::Failed(msg),
        }
    }
}
