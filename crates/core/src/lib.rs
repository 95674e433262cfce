pub mod assets;
pub mod models;
pub mod traits;

pub use models::*;
pub use traits::*;
