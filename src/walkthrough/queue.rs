use crate::clients::Queue;
use crate::core::config::AppConfig;
use crate::errors::TourError;

use super::finish;

#[derive(Debug, Clone)]
pub struct QueueSettings {
    pub queue_base: String,
    pub message: String,
}

impl Default for QueueSettings {
    fn default() -> Self {
        Self {
            queue_base: "message_queue".to_string(),
            message: "I love Rust".to_string(),
        }
    }
}

/// Creates a queue, sends one message and reads it back.
pub async fn run(config: &AppConfig, settings: &QueueSettings) -> Result<(), TourError> {
    let sdk_config = config.sdk_config().await;
    let mut queue = Queue::new(&sdk_config);
    let queue_name = config.resource_name(&settings.queue_base);

    let steps = async {
        queue.create_queue(&queue_name).await?;
        queue.queue_stats().await?;
        queue.send_message(&settings.message).await?;
        queue.read_messages(1).await?;
        Ok::<_, TourError>(())
    }
    .await;

    let cleanup = queue.cleanup().await;
    finish("queue", steps, [cleanup])
}
