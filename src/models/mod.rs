//! Data models for SferaNet entities

mod customer;
mod practice;
mod service;
mod status;

pub use customer::*;
pub use practice::*;
pub use service::*;
pub use status::*;
