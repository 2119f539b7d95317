#![warn(clippy::pedantic)]

pub mod error;
pub mod extended;
pub mod frame;
pub mod header;
pub mod syncsafe;
pub mod unsync;

pub use error::WireError;
pub use frame::{FRAME_HEADER_SIZE, FrameFlags, FrameHeader, FrameId};
pub use header::{HEADER_SIZE, Probe, RejectReason, TagFlags, TagHeader, Version};
