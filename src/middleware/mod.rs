/// Middleware module
///
/// Request extractors and wrappers for authentication, logging and metrics.

mod authenticated_user;
mod hits;
mod logger;

pub use authenticated_user::AuthenticatedUser;
pub use hits::{FileServerHits, HitCounter};
pub use logger::LoggerMiddleware;
