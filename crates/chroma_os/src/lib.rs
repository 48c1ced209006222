#![forbid(unsafe_code)]

pub mod access;
pub mod error;
pub mod palette;
pub mod palette_color;
pub mod runtime;

pub use error::PaletteError;
pub use runtime::PaletteRuntime;
