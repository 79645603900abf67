//! Identity adapter: authentication flows and the principal stream

pub mod ports;
pub mod service;
pub mod subscription;

pub use ports::{ExternalIdentity, IdentityProvider};
pub use service::AuthService;
pub use subscription::PrincipalSubscription;
