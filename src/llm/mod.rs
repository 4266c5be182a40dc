// Narrative generation: an opaque text collaborator that turns a finished
// draft summary into prose. The engine never depends on it; the app streams
// its output to the client as advisory text.

pub mod client;
pub mod prompt;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::protocol::LlmEvent;

/// Seam for the text-generation collaborator. The production implementation
/// streams from the Anthropic Messages API; tests substitute canned streams.
#[async_trait]
pub trait NarrativeGenerator: Send + Sync {
    /// Stream a narrative for `user_content`, emitting [`LlmEvent`]s tagged
    /// with `generation` so stale streams can be discarded downstream.
    async fn stream_message(
        &self,
        system: &str,
        user_content: &str,
        max_tokens: u32,
        tx: mpsc::Sender<LlmEvent>,
        generation: u64,
    ) -> anyhow::Result<()>;
}
