pub mod client;
pub mod types;
pub mod error;

pub use client::HackQrClient;
pub use types::*;
pub use error::{SdkError, SdkResult};
