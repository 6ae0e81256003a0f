pub mod publisher;

use serde::Serialize;

use milan_shared::clients::rabbitmq::RabbitMQClient;
use milan_shared::types::Event;

/// Outbound domain events. Without a broker every publish is a logged no-op.
#[derive(Clone, Default)]
pub struct EventBus {
    client: Option<RabbitMQClient>,
}

impl EventBus {
    /// Connect when a URL is configured. A broker that cannot be reached
    /// leaves the bus disabled rather than failing startup.
    pub async fn connect(url: Option<&str>) -> Self {
        let Some(url) = url else {
            tracing::info!("no rabbitmq_url configured, domain events disabled");
            return Self::disabled();
        };

        match RabbitMQClient::connect(url).await {
            Ok(client) => Self { client: Some(client) },
            Err(e) => {
                tracing::warn!(error = %e, "rabbitmq unavailable, domain events disabled");
                Self::disabled()
            }
        }
    }

    pub fn disabled() -> Self {
        Self { client: None }
    }

    /// `None` when no broker is configured.
    pub fn is_connected(&self) -> Option<bool> {
        self.client.as_ref().map(RabbitMQClient::is_connected)
    }

    pub async fn publish<T: Serialize>(&self, routing_key: &str, event: Event<T>) {
        let Some(client) = &self.client else {
            tracing::debug!(routing_key = %routing_key, "event dropped, no broker");
            return;
        };

        if let Err(e) = client.publish(routing_key, &event).await {
            tracing::error!(error = %e, routing_key = %routing_key, "failed to publish event");
        }
    }
}
