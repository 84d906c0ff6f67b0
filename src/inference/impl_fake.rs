use crate::inference::interface::{InferenceClient, InferenceError, Prompt};
use crate::library::logger::interface::Logger;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

const REPLIES: &[&str] = &[
    "I see a person sitting at a desk.",
    "There is a laptop and a cup on the table.",
    "The room looks well lit.",
    "Someone is waving at the camera.",
];

/// Answers locally after `latency`, keeping count of calls and of the
/// highest number of calls that overlapped.
pub struct InferenceClientFake {
    latency: Duration,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    calls: AtomicUsize,
    failure: Option<(u16, String)>,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl InferenceClientFake {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>, latency: Duration) -> Self {
        Self {
            latency,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
            failure: None,
            logger: logger.with_namespace("inference").with_namespace("fake"),
        }
    }

    pub fn failing_with(mut self, status: u16, body: &str) -> Self {
        self.failure = Some((status, body.to_string()));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl InferenceClient for InferenceClientFake {
    fn complete(&self, base_url: &str, prompt: &Prompt) -> Result<String, InferenceError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(in_flight, Ordering::SeqCst);

        let _ = self.logger.info(&format!(
            "Answering {:?} for {} (call #{})",
            prompt.instruction,
            base_url,
            call + 1
        ));
        std::thread::sleep(self.latency);

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match &self.failure {
            Some((status, body)) => Err(InferenceError::Server {
                status: *status,
                body: body.clone(),
            }),
            None => Ok(REPLIES[rand::random_range(0..REPLIES.len())].to_string()),
        }
    }
}
