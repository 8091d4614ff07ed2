#[allow(clippy::module_inception)]
mod session;

pub use session::{Session, SessionError};
