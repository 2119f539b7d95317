#![warn(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod frame;
pub mod frame_ids;
pub mod pool;
pub mod scanner;
pub mod streaming;
pub mod tag;
pub mod text;
pub mod tokenizer;

mod buffer;

pub use config::ScanConfig;
pub use error::{DecodeError, TextError};
pub use frame::{Frame, Frames};
pub use frame_ids::{frame_name, ids};
pub use id3_wire::{FrameFlags, FrameId, TagFlags, TagHeader, Version};
pub use scanner::{Scanner, scan, scan_bytes, scan_file};
pub use streaming::{AsyncScanner, scan_async};
pub use tag::DecodedTag;
pub use text::{TextEncoding, decode_text, strip_control, strip_nul};
