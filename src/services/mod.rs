pub mod busifavor_service;

pub use busifavor_service::*;
