pub mod analysis;
pub mod blast;
pub mod decode;
pub mod detect;
pub mod segment;
pub mod spectrum;
pub mod types;
