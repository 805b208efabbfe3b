// ============================================
// File: crates/dragonet-cli/src/responder.rs
// ============================================
//! # Echo Responder
//!
//! ## Creation Reason
//! Decides what a diagnostic peer answers to each message kind, kept
//! apart from socket handling so the mapping is testable on its own.
//!
//! ## Reply Table
//! | Received              | Reply                                  |
//! |-----------------------|----------------------------------------|
//! | `Heartbeat(seq)`      | `Heartbeat(seq)`                       |
//! | `Data(seq, ..)`       | `Ack(consumedSeq = seq, [seq])`        |
//! | `Close(seq, status)`  | `Close(seq, status)`                   |
//! | `Ack(..)`             | nothing                                |
//!
//! ## Last Modified
//! v0.1.0 - Initial responder

use dragonet_core::protocol::{AckMessage, Message};

/// Returns the reply for `msg`, if it gets one.
#[must_use]
pub fn reply_to(msg: &Message) -> Option<Message> {
    match msg {
        Message::Heartbeat(hb) => Some(Message::Heartbeat(*hb)),
        Message::Data(data) => Some(Message::Ack(AckMessage::new(
            data.seq(),
            vec![data.seq()],
        ))),
        Message::Close(close) => Some(Message::Close(*close)),
        // Acks are never acknowledged
        Message::Ack(_) => None,
    }
}
