pub mod map;
pub mod node;
pub mod session;
