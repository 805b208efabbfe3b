//! Message exchange over real loopback sockets.

use std::sync::Arc;
use std::time::Duration;

use dragonet_core::protocol::{
    AckMessage, CloseMessage, DataMessage, HeartbeatMessage, Message, WireMessage,
};
use dragonet_core::{ChaChaCryptor, PacketCryptor, PacketKey, PlainCryptor};
use dragonet_transport::{
    MessageChannel, Transport, TransportError, UdpTransport, DEFAULT_MAX_DATAGRAM_SIZE,
};

async fn channel(cryptor: Arc<dyn PacketCryptor>) -> MessageChannel<UdpTransport> {
    let transport = UdpTransport::bind("127.0.0.1:0").await.unwrap();
    MessageChannel::new(transport, cryptor, DEFAULT_MAX_DATAGRAM_SIZE).unwrap()
}

fn shared_key() -> PacketKey {
    PacketKey::derive_from_passphrase("loopback test secret").unwrap()
}

#[tokio::test]
async fn messages_cross_loopback_encrypted() {
    let a = channel(Arc::new(ChaChaCryptor::new(shared_key()))).await;
    let b = channel(Arc::new(ChaChaCryptor::new(shared_key()))).await;
    let b_addr = b.transport().local_addr().unwrap();
    let a_addr = a.transport().local_addr().unwrap();

    let outgoing: Vec<Message> = vec![
        DataMessage::new(1, b"first".to_vec()).into(),
        AckMessage::new(1, vec![1]).into(),
        HeartbeatMessage::new(2).into(),
        CloseMessage::new(3, 0).into(),
    ];

    for msg in &outgoing {
        a.send(msg, &b_addr).await.unwrap();
        let (received, source) = b.recv_timeout(Duration::from_secs(2)).await.unwrap();
        assert_eq!(&received, msg);
        assert_eq!(source.addr, a_addr);
    }
}

#[tokio::test]
async fn plaintext_datagrams_are_raw_wire_bytes() {
    let a = channel(Arc::new(PlainCryptor)).await;
    let raw = UdpTransport::bind("127.0.0.1:0").await.unwrap();
    let raw_addr = raw.local_addr().unwrap();

    let msg = CloseMessage::new(777, 42);
    a.send(&msg, &raw_addr).await.unwrap();

    let mut buf = [0u8; 64];
    let (len, _) = raw.recv(&mut buf).await.unwrap();
    assert_eq!(&buf[..len], msg.encode().as_ref());
}

#[tokio::test]
async fn wrong_key_datagrams_are_dropped() {
    let receiver = channel(Arc::new(ChaChaCryptor::new(shared_key()))).await;
    let receiver_addr = receiver.transport().local_addr().unwrap();

    let stranger = channel(Arc::new(ChaChaCryptor::new(PacketKey::generate()))).await;
    stranger.send(&HeartbeatMessage::new(1), &receiver_addr).await.unwrap();

    let friend = channel(Arc::new(ChaChaCryptor::new(shared_key()))).await;
    friend.send(&HeartbeatMessage::new(2), &receiver_addr).await.unwrap();

    let (msg, _) = receiver.recv_timeout(Duration::from_secs(2)).await.unwrap();
    assert_eq!(msg, Message::Heartbeat(HeartbeatMessage::new(2)));
}

#[tokio::test]
async fn garbage_then_valid_message() {
    let receiver = channel(Arc::new(PlainCryptor)).await;
    let receiver_addr = receiver.transport().local_addr().unwrap();

    let sender = UdpTransport::bind("127.0.0.1:0").await.unwrap();
    sender.send(&[0xFF, 0xFF, 0xFF], &receiver_addr).await.unwrap();
    sender
        .send(&HeartbeatMessage::new(9).encode(), &receiver_addr)
        .await
        .unwrap();

    let (msg, _) = receiver.recv_timeout(Duration::from_secs(2)).await.unwrap();
    assert_eq!(msg.as_heartbeat().map(HeartbeatMessage::seq), Some(9));
}

#[tokio::test]
async fn oversized_datagrams_are_not_truncated_into_messages() {
    let transport = UdpTransport::bind("127.0.0.1:0").await.unwrap();
    let receiver = MessageChannel::new(transport, Arc::new(PlainCryptor), 128).unwrap();
    let receiver_addr = receiver.transport().local_addr().unwrap();
    let sender = UdpTransport::bind("127.0.0.1:0").await.unwrap();

    // Its first 128 bytes would decode as a Data message if cut short
    let mut oversized = DataMessage::new(5, vec![0xAB; 120]).encode().to_vec();
    oversized.extend_from_slice(&[0xCD; 64]);
    sender.send(&oversized, &receiver_addr).await.unwrap();

    let err = receiver.recv().await.unwrap_err();
    assert!(matches!(err, TransportError::OversizedDatagram { max: 128, .. }));
    assert!(err.is_malformed_datagram());

    sender.send(&oversized, &receiver_addr).await.unwrap();
    sender
        .send(&HeartbeatMessage::new(6).encode(), &receiver_addr)
        .await
        .unwrap();
    let (msg, _) = receiver.recv_timeout(Duration::from_secs(2)).await.unwrap();
    assert_eq!(msg, Message::Heartbeat(HeartbeatMessage::new(6)));
}

#[tokio::test]
async fn silence_times_out() {
    let receiver = channel(Arc::new(PlainCryptor)).await;
    let err = receiver
        .recv_timeout(Duration::from_millis(50))
        .await
        .unwrap_err();
    assert!(matches!(err, TransportError::Timeout { .. }));
    assert!(err.is_retryable());
}
