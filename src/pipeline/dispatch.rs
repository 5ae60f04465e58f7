//! Sequential chunk delivery with inter-chunk pacing.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

use crate::core::models::DeliveryReport;
use crate::errors::{BotError, SendError};
use crate::formatting::Chunk;

/// Pause between consecutive chunk sends, respecting the channel's own
/// throughput limits.
pub const DEFAULT_PACING: Duration = Duration::from_millis(1000);

/// One message delivered to the destination channel. Returns the channel's
/// identifier for the sent message.
#[async_trait]
pub trait MessageSink: Send + Sync {
    async fn send(&self, text: &str) -> Result<i64, SendError>;
}

pub struct Dispatcher {
    sink: Arc<dyn MessageSink>,
    pacing: Duration,
}

impl Dispatcher {
    pub fn new(sink: Arc<dyn MessageSink>) -> Self {
        Self {
            sink,
            pacing: DEFAULT_PACING,
        }
    }

    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    /// Deliver all chunks in order, one request per chunk. Sends are
    /// strictly sequential; the first failure aborts the remainder and
    /// reports the failing chunk's position. Already-sent chunks stay
    /// delivered — there is no rollback.
    pub async fn deliver(&self, chunks: &[Chunk]) -> Result<DeliveryReport, BotError> {
        let total = chunks.len();
        let mut delivered = 0usize;
        let mut last_message_id = None;

        for chunk in chunks {
            let message = render_chunk(chunk);
            match self.sink.send(&message).await {
                Ok(message_id) => {
                    delivered += 1;
                    last_message_id = Some(message_id);
                    info!(
                        "Sent chunk {}/{} (message_id={})",
                        chunk.index, chunk.total, message_id
                    );
                }
                Err(e) => {
                    error!("Send failed at chunk {}/{}: {}", chunk.index, chunk.total, e);
                    return Err(BotError::Dispatch {
                        index: chunk.index,
                        total,
                        delivered,
                        reason: e.to_string(),
                    });
                }
            }

            if chunk.index < chunk.total {
                tokio::time::sleep(self.pacing).await;
            }
        }

        Ok(DeliveryReport {
            delivered,
            last_message_id,
        })
    }
}

/// Multi-part deliveries carry their position; a lone chunk goes out as-is.
pub fn render_chunk(chunk: &Chunk) -> String {
    if chunk.total > 1 {
        format!("[{}/{}]\n{}", chunk.index, chunk.total, chunk.text)
    } else {
        chunk.text.clone()
    }
}
