pub mod formatter;

pub use formatter::{Formatter, Tone};
