//! Text report rendering.
//!
//! A report starts with a banner ([`writer::write_header`]) and is followed
//! by one block per comparison that found differences. Blocks are rendered
//! completely in memory and appended with a single write, so a failure in a
//! later comparison never leaves a partial block behind.

pub mod structural;
pub mod tabular;
pub mod writer;

pub use writer::{append_block, write_header, BannerColumns, ReportError};
