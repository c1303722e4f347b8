use bevy::prelude::{Handle, Mesh, Resource, StandardMaterial};
use crossbeam_channel::{Receiver, Sender};
use relgraph_core::ColorCategory;

use crate::net::Incoming;

#[derive(Resource)]
pub struct NetRx(pub Receiver<Incoming>);

#[derive(Resource)]
pub struct NetTx(pub Sender<Incoming>);

/// Shared sphere mesh and one material per colour category.
#[derive(Resource)]
pub struct NodeAssets {
    pub sphere: Handle<Mesh>,
    pub user: Handle<StandardMaterial>,
    pub group: Handle<StandardMaterial>,
    pub other: Handle<StandardMaterial>,
    pub selected: Handle<StandardMaterial>,
}

impl NodeAssets {
    pub fn material(&self, category: ColorCategory) -> Handle<StandardMaterial> {
        match category {
            ColorCategory::User => self.user.clone(),
            ColorCategory::Group => self.group.clone(),
            ColorCategory::Other => self.other.clone(),
        }
    }
}
