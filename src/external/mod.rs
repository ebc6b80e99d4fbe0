pub mod busifavor;
pub mod requests;

pub use busifavor::*;
pub use requests::*;
