#[allow(clippy::module_inception)]
pub mod api;
pub mod disk;
pub mod vk;

pub use api::*;
pub use disk::*;
pub use vk::*;
