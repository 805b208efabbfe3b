//! Listener and prober talking over loopback UDP.

use std::sync::Arc;
use std::time::Duration;

use dragonet_cli::{CliConfig, Listener, Prober};
use dragonet_core::protocol::{AckMessage, CloseMessage, DataMessage, Message};
use dragonet_transport::{MessageChannel, UdpTransport};

const CONFIG: &str = r#"
    [network]
    listen_addr = "127.0.0.1:9225"
    max_datagram_size = 512

    [crypto]
    cipher = "chacha20-poly1305"
    passphrase = "echo test"

    [probe]
    timeout_ms = 1000
    count = 3
"#;

async fn channel(config: &CliConfig) -> MessageChannel<UdpTransport> {
    let transport = UdpTransport::bind("127.0.0.1:0").await.unwrap();
    MessageChannel::new(
        transport,
        config.build_cryptor().unwrap(),
        config.network.max_datagram_size,
    )
    .unwrap()
}

#[tokio::test]
async fn ping_against_listener() {
    let config = CliConfig::from_str(CONFIG).unwrap();

    let listener = Arc::new(Listener::new(channel(&config).await));
    let listener_addr = listener.local_addr().unwrap();
    let task = {
        let listener = Arc::clone(&listener);
        tokio::spawn(async move { listener.run().await })
    };

    let prober = Prober::new(channel(&config).await, config.probe_timeout());
    let report = prober.ping(listener_addr, config.probe.count).await.unwrap();

    assert_eq!(report.sent, 3);
    assert_eq!(report.received(), 3);
    assert!(report.max_rtt().unwrap() < Duration::from_secs(1));

    listener.shutdown();
    task.await.unwrap().unwrap();
    assert_eq!(listener.replied_count(), 3);
}

#[tokio::test]
async fn listener_acks_data_and_echoes_close() {
    let config = CliConfig::from_str(CONFIG).unwrap();

    let listener = Arc::new(Listener::new(channel(&config).await));
    let listener_addr = listener.local_addr().unwrap();
    let task = {
        let listener = Arc::clone(&listener);
        tokio::spawn(async move { listener.run().await })
    };

    let client = channel(&config).await;
    let timeout = Duration::from_secs(2);

    client
        .send(&DataMessage::new(17, b"hello".to_vec()), &listener_addr)
        .await
        .unwrap();
    let (reply, source) = client.recv_timeout(timeout).await.unwrap();
    assert_eq!(reply, Message::Ack(AckMessage::new(17, vec![17])));
    assert_eq!(source.addr, listener_addr);

    client
        .send(&CloseMessage::new(18, 5), &listener_addr)
        .await
        .unwrap();
    let (reply, _) = client.recv_timeout(timeout).await.unwrap();
    assert_eq!(reply, Message::Close(CloseMessage::new(18, 5)));

    listener.shutdown();
    task.await.unwrap().unwrap();
}

#[tokio::test]
async fn mismatched_keys_get_no_answer() {
    let config = CliConfig::from_str(CONFIG).unwrap();
    let other = CliConfig::from_str(&CONFIG.replace("echo test", "other secret")).unwrap();

    let listener = Arc::new(Listener::new(channel(&config).await));
    let listener_addr = listener.local_addr().unwrap();
    let task = {
        let listener = Arc::clone(&listener);
        tokio::spawn(async move { listener.run().await })
    };

    let prober = Prober::new(channel(&other).await, Duration::from_millis(100));
    let report = prober.ping(listener_addr, 2).await.unwrap();
    assert_eq!(report.received(), 0);

    listener.shutdown();
    task.await.unwrap().unwrap();
    assert_eq!(listener.received_count(), 0);
}
