use std::sync::{Arc, Mutex};
use yt_article::mqtt::MessagePublisher;

/// Records every publish as `(topic, payload, retain)`
#[derive(Clone, Default)]
pub struct MockPublisher {
    pub published: Arc<Mutex<Vec<(String, String, bool)>>>,
    pub fail_with: Option<String>,
}

impl MockPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Self::default()
        }
    }

    pub fn on_topic(&self, topic: &str) -> Vec<String> {
        self.published
            .lock()
            .unwrap()
            .iter()
            .filter(|(t, _, _)| t == topic)
            .map(|(_, payload, _)| payload.clone())
            .collect()
    }
}

impl MessagePublisher for MockPublisher {
    type Error = anyhow::Error;

    async fn publish(&self, topic: &str, payload: Vec<u8>, retain: bool) -> Result<(), Self::Error> {
        if let Some(ref msg) = self.fail_with {
            return Err(anyhow::anyhow!("{}", msg));
        }
        self.published.lock().unwrap().push((
            topic.to_string(),
            String::from_utf8(payload)?,
            retain,
        ));
        Ok(())
    }
}
