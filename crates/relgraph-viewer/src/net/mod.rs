pub mod http;
pub mod protocol;

pub use http::spawn_loader;
pub use protocol::{Incoming, IncomingKind};
