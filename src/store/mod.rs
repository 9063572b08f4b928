pub mod edit_session_cache;
pub mod memory;
pub mod traits;

pub use edit_session_cache::*;
pub use memory::*;
pub use traits::*;
