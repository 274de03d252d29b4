//! Core types shared across the vbm engine: the error enumeration and the
//! cancellation signal passed down into backend operations.

pub mod cancel;
pub mod error;

pub use cancel::CancelToken;
pub use error::VbmError;
