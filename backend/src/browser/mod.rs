pub mod defaults;
pub mod loader;
pub mod navigator;
pub mod normalize;
pub mod outline;

pub use navigator::Navigator;
pub use normalize::{TreeDocument, parse_document};
