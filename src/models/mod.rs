pub mod recommendation;
pub mod repository;
pub mod session;
pub mod user;

pub use recommendation::*;
pub use repository::*;
pub use session::*;
pub use user::*;
