//! Raw byte arithmetic for the binary and Modbus decoders
//!
//! Nothing here knows about frame layouts or field roles. Conversions return
//! `None` on short or oversized input instead of indexing past the end.

pub mod bit_ops;
pub mod byte_order;
pub mod conversions;

pub use bit_ops::*;
pub use byte_order::{ByteOrder, WordOrder};
pub use conversions::*;
