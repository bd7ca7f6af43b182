mod health;
mod url;

pub use health::health_handler;
pub use url::{delete_handler, resolve_handler, shorten_handler};
