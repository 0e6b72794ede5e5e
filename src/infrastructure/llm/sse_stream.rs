use crate::application::ports::ModelGatewayError;

use super::wire::StreamEvent;

/// Accumulates content from a `data: `-framed event stream. Network chunks
/// may split lines (and UTF-8 sequences) anywhere; bytes are buffered until
/// a full line is available.
#[derive(Debug, Default)]
pub struct SseAccumulator {
    pending: Vec<u8>,
    content: String,
    finished: bool,
    skipped: usize,
}

impl SseAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn push(&mut self, chunk: &[u8]) {
        if self.finished {
            return;
        }
        self.pending.extend_from_slice(chunk);

        while let Some(newline) = self.pending.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=newline).collect();
            self.process_line(&String::from_utf8_lossy(&line));
            if self.finished {
                self.pending.clear();
                return;
            }
        }
    }

    /// Flushes a trailing unterminated line and returns the accumulated text.
    pub fn finish(mut self) -> Result<String, ModelGatewayError> {
        if !self.finished && !self.pending.is_empty() {
            let rest = std::mem::take(&mut self.pending);
            self.process_line(&String::from_utf8_lossy(&rest));
        }
        if self.skipped > 0 {
            tracing::debug!(skipped = self.skipped, "Skipped malformed stream events");
        }
        if self.content.is_empty() {
            return Err(ModelGatewayError::EmptyResponse);
        }
        Ok(self.content)
    }

    fn process_line(&mut self, line: &str) {
        let line = line.trim_end_matches(['\r', '\n']);
        let Some(data) = line.strip_prefix("data:") else {
            return;
        };
        let data = data.trim_start();

        if data == "[DONE]" {
            self.finished = true;
            return;
        }

        match serde_json::from_str::<StreamEvent>(data) {
            Ok(event) => {
                if let Some(content) = event.content() {
                    self.content.push_str(content);
                }
                if event.done {
                    self.finished = true;
                }
            }
            Err(_) => self.skipped += 1,
        }
    }
}
