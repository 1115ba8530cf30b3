//! Port for persisting uploaded document bytes.
use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Failures raised by document storage adapters.
    pub enum DocumentStoreError {
        /// The storage root could not be reached.
        Unavailable { message: String } => "document storage unavailable: {message}",
        /// Writing one file failed.
        Write { file_name: String, message: String } => "failed to store {file_name}: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Write `bytes` under `file_name` and return the stored path.
    ///
    /// `file_name` is a single sanitised path component.
    async fn store(&self, file_name: &str, bytes: &[u8]) -> Result<String, DocumentStoreError>;
}
