pub mod ppm;

pub use ppm::{PpmError, decode, load};
