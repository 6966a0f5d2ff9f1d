//! Face compositing - cropping, scaling and layering texture regions

mod background;
mod error;
pub mod raster;
mod plain;
mod registry;
mod snout;

// Re-export public API
pub use background::{crop_face_with_background, BackgroundComposer, Bounds};
pub use error::ProcessingError;
pub use plain::{crop_face, PlainComposer};
pub use registry::{ComposeMode, Composed, ComposerRegistry, FaceComposer};
pub use snout::{crop_face_with_snout, SnoutComposer};

/// Result type alias for compositing operations.
pub type Result<T> = std::result::Result<T, ProcessingError>;
