use crate::error::RenderError;
use crate::results::PageSnapshot;
use std::future::Future;

/// Capability to turn a page address into a finished DOM snapshot
///
/// Implementations own their browsing context for the duration of a call and
/// must release it before returning, whatever the outcome.
pub trait Renderer: Send + Sync {
    /// Load `address` and return its snapshot once the page is network-idle
    fn render(
        &self,
        address: &str,
    ) -> impl Future<Output = Result<PageSnapshot, RenderError>> + Send;
}
