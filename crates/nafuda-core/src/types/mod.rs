pub mod media;
pub mod quality;
pub mod tv;

pub use media::{MediaFile, MovieFile};
pub use quality::Quality;
pub use tv::TvFile;
