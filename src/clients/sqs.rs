use aws_config::SdkConfig;
use aws_sdk_sqs::Client as SqsClient;
use aws_sdk_sqs::types::QueueAttributeName;
use tracing::info;

use crate::errors::TourError;

/// Seconds a received message stays hidden before it becomes visible again.
pub const VISIBILITY_TIMEOUT_SECS: i32 = 60;
/// Long-poll window for `receive_message`.
pub const WAIT_TIME_SECS: i32 = 20;

pub const DEFAULT_DELAY_SECONDS: &str = "0";
pub const DEFAULT_RETENTION_SECONDS: &str = "3600";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QueueStats {
    pub visible: u64,
    pub not_visible: u64,
}

pub struct Queue {
    client: SqsClient,
    queue_url: Option<String>,
}

impl Queue {
    pub fn new(sdk_config: &SdkConfig) -> Self {
        info!("Created Amazon SQS client");
        Self::from_client(SqsClient::new(sdk_config))
    }

    pub fn from_client(client: SqsClient) -> Self {
        Self {
            client,
            queue_url: None,
        }
    }

    pub fn queue_url(&self) -> Option<&str> {
        self.queue_url.as_deref()
    }

    fn require_url(&self) -> Result<&str, TourError> {
        self.queue_url
            .as_deref()
            .ok_or_else(|| TourError::NotReady("No queue created. Run create_queue first.".into()))
    }

    pub async fn create_queue(&mut self, queue_name: &str) -> Result<String, TourError> {
        self.create_queue_with(queue_name, DEFAULT_DELAY_SECONDS, DEFAULT_RETENTION_SECONDS)
            .await
    }

    pub async fn create_queue_with(
        &mut self,
        queue_name: &str,
        delay_seconds: &str,
        retention_seconds: &str,
    ) -> Result<String, TourError> {
        let output = self
            .client
            .create_queue()
            .queue_name(queue_name)
            .attributes(QueueAttributeName::DelaySeconds, delay_seconds)
            .attributes(QueueAttributeName::MessageRetentionPeriod, retention_seconds)
            .send()
            .await?;

        let url = output
            .queue_url()
            .ok_or_else(|| TourError::AwsError(format!("Queue {queue_name} created without URL")))?
            .to_string();
        info!(queue_name, queue_url = %url, "Created SQS queue");
        self.queue_url = Some(url.clone());
        Ok(url)
    }

    pub async fn queue_stats(&self) -> Result<QueueStats, TourError> {
        let output = self
            .client
            .get_queue_attributes()
            .queue_url(self.require_url()?)
            .attribute_names(QueueAttributeName::All)
            .send()
            .await?;

        let count = |name: QueueAttributeName| {
            output
                .attributes()
                .and_then(|attributes| attributes.get(&name))
                .and_then(|value| value.parse::<u64>().ok())
                .unwrap_or_default()
        };
        let stats = QueueStats {
            visible: count(QueueAttributeName::ApproximateNumberOfMessages),
            not_visible: count(QueueAttributeName::ApproximateNumberOfMessagesNotVisible),
        };
        info!(
            visible = stats.visible,
            not_visible = stats.not_visible,
            "Approximate queue message counts"
        );
        Ok(stats)
    }

    pub async fn send_message(&self, body: &str) -> Result<String, TourError> {
        let output = self
            .client
            .send_message()
            .queue_url(self.require_url()?)
            .message_body(body)
            .send()
            .await
            .map_err(|e| TourError::AwsError(format!("Failed to send message to SQS: {e}")))?;

        let message_id = output.message_id().unwrap_or_default().to_string();
        info!(message_id = %message_id, "Message sent");
        Ok(message_id)
    }

    /// Long-polls for up to `max_messages`, deletes each received message and
    /// returns the bodies.
    pub async fn read_messages(&self, max_messages: i32) -> Result<Vec<String>, TourError> {
        let queue_url = self.require_url()?;
        let output = self
            .client
            .receive_message()
            .queue_url(queue_url)
            .max_number_of_messages(max_messages)
            .visibility_timeout(VISIBILITY_TIMEOUT_SECS)
            .wait_time_seconds(WAIT_TIME_SECS)
            .send()
            .await?;

        let mut bodies = Vec::new();
        for message in output.messages() {
            let body = message.body().unwrap_or_default().to_string();
            info!(body = %body, "Received message");

            if let Some(receipt_handle) = message.receipt_handle() {
                self.client
                    .delete_message()
                    .queue_url(queue_url)
                    .receipt_handle(receipt_handle)
                    .send()
                    .await?;
            }
            bodies.push(body);
        }
        Ok(bodies)
    }

    /// Deletes the queue if one was created. The URL is kept when deletion
    /// fails so cleanup can be retried.
    pub async fn cleanup(&mut self) -> Result<(), TourError> {
        let Some(queue_url) = self.queue_url.as_deref() else {
            info!("No queue to delete");
            return Ok(());
        };

        self.client
            .delete_queue()
            .queue_url(queue_url)
            .send()
            .await?;
        info!(queue_url, "Deleted SQS queue");
        self.queue_url = None;
        Ok(())
    }
}
