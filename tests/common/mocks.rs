use async_trait::async_trait;
use gemini_agent::{Error, Result, llm::ModelHandle};
use std::sync::{Arc, Mutex};

/// Mock model handle for testing: records every message it is asked to
/// generate for, and answers with a scripted reply or a scripted failure.
pub struct MockModelHandle {
    pub requests: Arc<Mutex<Vec<String>>>,
    reply: String,
    error: Option<String>,
}

impl MockModelHandle {
    pub fn replying(reply: impl Into<String>) -> Self {
        Self {
            requests: Arc::new(Mutex::new(Vec::new())),
            reply: reply.into(),
            error: None,
        }
    }

    pub fn failing(error: impl Into<String>) -> Self {
        Self {
            requests: Arc::new(Mutex::new(Vec::new())),
            reply: String::new(),
            error: Some(error.into()),
        }
    }

    pub fn recorded_requests(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.requests)
    }
}

#[async_trait]
impl ModelHandle for MockModelHandle {
    async fn generate(&self, message: &str) -> Result<String> {
        self.requests.lock().unwrap().push(message.to_string());

        match &self.error {
            Some(error) => Err(Error::provider(error.clone())),
            None => Ok(self.reply.clone()),
        }
    }
}
