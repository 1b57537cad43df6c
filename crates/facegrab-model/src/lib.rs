pub mod identifier;
pub mod image_ref;
pub mod report;

pub use identifier::*;
pub use image_ref::*;
pub use report::*;
