pub mod color;
pub mod error;
pub mod sampler;

pub use color::{contrast_color, dominant_color, dominant_color_from_bytes, Rgb};
pub use error::MediaError;
pub use sampler::ColorSampler;
