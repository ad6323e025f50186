use std::sync::Mutex;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SpeechError {
    #[error("cannot start listening while the assistant is speaking")]
    Busy,
}

/// Start/stop/result contract over a speech recognizer and synthesizer.
/// Teardown paths call `stop_speaking`/`stop_listening` synchronously, so
/// neither may block.
pub trait SpeechIo: Send + Sync {
    fn start_listening(&self) -> Result<(), SpeechError>;
    fn stop_listening(&self);
    fn speak(&self, text: &str) -> Result<(), SpeechError>;
    fn stop_speaking(&self);
    fn is_listening(&self) -> bool;
    fn is_speaking(&self) -> bool;

    /// Utterances waiting for an out-of-process synthesizer to pick them up.
    fn drain_utterances(&self) -> Vec<String> {
        Vec::new()
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SpeechState {
    pub listening: bool,
    pub speaking: bool,
}

impl SpeechState {
    pub fn of(speech: &dyn SpeechIo) -> Self {
        Self {
            listening: speech.is_listening(),
            speaking: speech.is_speaking(),
        }
    }
}

#[derive(Default)]
struct Relay {
    listening: bool,
    speaking: bool,
    outbox: Vec<String>,
}

/// Speech adapter for a browser client: the browser owns the microphone and
/// the synthesizer, the gateway tracks their state and queues what to say.
#[derive(Default)]
pub struct RelayedSpeech {
    relay: Mutex<Relay>,
}

impl RelayedSpeech {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SpeechIo for RelayedSpeech {
    fn start_listening(&self) -> Result<(), SpeechError> {
        self.relay.lock().unwrap().listening = true;
        Ok(())
    }

    fn stop_listening(&self) {
        self.relay.lock().unwrap().listening = false;
    }

    fn speak(&self, text: &str) -> Result<(), SpeechError> {
        let mut relay = self.relay.lock().unwrap();
        relay.speaking = true;
        relay.outbox.push(text.to_string());
        Ok(())
    }

    fn stop_speaking(&self) {
        let mut relay = self.relay.lock().unwrap();
        relay.speaking = false;
        relay.outbox.clear();
    }

    fn is_listening(&self) -> bool {
        self.relay.lock().unwrap().listening
    }

    fn is_speaking(&self) -> bool {
        self.relay.lock().unwrap().speaking
    }

    fn drain_utterances(&self) -> Vec<String> {
        std::mem::take(&mut self.relay.lock().unwrap().outbox)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speak_queues_and_stop_clears() {
        let speech = RelayedSpeech::new();
        speech.speak("hello").unwrap();
        assert!(speech.is_speaking());
        speech.stop_speaking();
        assert!(!speech.is_speaking());
        assert!(speech.drain_utterances().is_empty());
    }

    #[test]
    fn test_drain_keeps_speaking_flag() {
        let speech = RelayedSpeech::new();
        speech.speak("hello").unwrap();
        assert_eq!(speech.drain_utterances(), vec!["hello".to_string()]);
        assert!(speech.drain_utterances().is_empty());
        assert!(speech.is_speaking());
    }

    #[test]
    fn test_listening_flags() {
        let speech = RelayedSpeech::new();
        speech.start_listening().unwrap();
        assert_eq!(
            SpeechState::of(&speech),
            SpeechState {
                listening: true,
                speaking: false
            }
        );
        speech.stop_listening();
        assert!(!speech.is_listening());
    }
}
