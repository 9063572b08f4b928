pub mod handlers;
pub mod routes;
pub mod session_handlers;
pub mod user_extractor;

pub use handlers::*;
pub use routes::*;
pub use session_handlers::*;
