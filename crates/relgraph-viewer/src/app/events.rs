use bevy::prelude::Event;
use relgraph_core::NodeId;

#[derive(Event)]
pub struct Picked(pub NodeId);
