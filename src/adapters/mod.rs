// Adapters layer: concrete implementations of the domain ports.

pub mod browser;
pub mod mail;
pub mod storage;

pub use browser::{ChromeLauncher, ChromePage, ExecutableSource};
pub use mail::{OneSecMailClient, OneSecMailbox};
#[cfg(feature = "lambda")]
pub use storage::S3Store;
pub use storage::LocalStore;
