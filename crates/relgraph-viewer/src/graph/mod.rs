pub mod state;

pub use state::{nearest_on_screen, GraphState, LoadStatus};
