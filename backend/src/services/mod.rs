//! Service layer for side effects
//!
//! This module contains service abstractions that separate side effects
//! (disk writes) from HTTP handlers, making the code more modular and testable.

pub mod uploads;

pub use uploads::{PhotoUpload, UploadSink};
