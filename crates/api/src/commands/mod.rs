//! Commands - the boundary the user interface calls into

mod auth;
mod entities;
mod health;
mod preferences;
mod search;

pub use auth::*;
pub use entities::*;
pub use health::*;
pub use preferences::*;
pub use search::*;
