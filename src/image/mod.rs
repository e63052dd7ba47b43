pub mod embedding;
pub mod io;
pub mod labels;
pub mod mask;
pub mod rgb;
pub mod traits;

pub use self::embedding::EmbeddingMap;
pub use self::labels::LabelMap;
pub use self::mask::ForegroundMask;
pub use self::rgb::{Rgb, RgbImage, RgbImageView};
pub use self::traits::{ImageView, ImageViewMut, Rows};
