use std::time::{Duration, Instant};

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;
use sp108e::{
    CommandFrame, DeviceClient, DeviceError, DeviceTransport, Opcode, TcpTransport,
    TcpTransportOptions, TransportError,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

const STATUS_REPLY: [u8; 17] = [
    0x38, 0x01, 0xd3, 0x80, 0xff, 0x02, 0x00, 0x3c, 0x00, 0x01, 0xff, 0x67, 0x17, 0x03, 0x00,
    0x10, 0xff,
];

fn options(io_timeout: Duration, write_cooldown: Duration) -> TcpTransportOptions {
    TcpTransportOptions::builder()
        .io_timeout(io_timeout)
        .write_cooldown(write_cooldown)
        .build()
}

/// Accepts one connection, records the six frame bytes, then writes `reply`.
async fn serve_once(reply: Vec<u8>) -> anyhow::Result<(String, JoinHandle<anyhow::Result<[u8; 6]>>)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let address = listener.local_addr()?.to_string();
    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await?;
        let mut frame = [0u8; 6];
        socket.read_exact(&mut frame).await?;
        socket.write_all(&reply).await?;
        socket.shutdown().await?;
        Ok::<_, anyhow::Error>(frame)
    });
    Ok((address, server))
}

#[tokio::test]
async fn status_exchange_sends_the_frame_and_reads_seventeen_bytes() -> anyhow::Result<()> {
    let (address, server) = serve_once(STATUS_REPLY.to_vec()).await?;
    let client = DeviceClient::new(Box::new(TcpTransport::new(
        address.clone(),
        options(Duration::from_secs(3), Duration::ZERO),
    )));

    let status = client.get_status().await?;

    assert_eq!([0x38, 0x00, 0x00, 0x00, 0x10, 0x83], server.await??);
    assert_eq!(&STATUS_REPLY, status.raw());
    assert_eq!(address, client.peer());
    Ok(())
}

#[tokio::test]
async fn write_only_commands_wait_for_the_cooldown() -> anyhow::Result<()> {
    let (address, server) = serve_once(Vec::new()).await?;
    let cooldown = Duration::from_millis(100);
    let transport = TcpTransport::new(address, options(Duration::from_secs(3), cooldown));

    let started = Instant::now();
    let reply = transport
        .send(CommandFrame::encode(Opcode::SetBrightness, "80")?, 0)
        .await?;

    assert!(started.elapsed() >= cooldown);
    assert!(reply.is_empty());
    assert_eq!([0x38, 0x80, 0x00, 0x00, 0x2a, 0x83], server.await??);
    Ok(())
}

#[tokio::test]
async fn silent_device_times_out() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let address = listener.local_addr()?.to_string();
    let server = tokio::spawn(async move {
        let (socket, _) = listener.accept().await?;
        tokio::time::sleep(Duration::from_secs(2)).await;
        drop(socket);
        anyhow::Ok(())
    });
    let transport = TcpTransport::new(
        address,
        options(Duration::from_millis(100), Duration::ZERO),
    );

    let error = transport
        .send(CommandFrame::bare(Opcode::GetStatus), 17)
        .await
        .expect_err("no reply should time out");

    assert_matches!(error, TransportError::Timeout { timeout_ms: 100, .. });
    server.abort();
    Ok(())
}

#[tokio::test]
async fn short_reply_is_a_read_error() -> anyhow::Result<()> {
    let (address, server) = serve_once(STATUS_REPLY[..5].to_vec()).await?;
    let client = DeviceClient::new(Box::new(TcpTransport::new(
        address,
        options(Duration::from_secs(3), Duration::ZERO),
    )));

    let error = client.get_status().await.expect_err("short reply should fail");

    assert_matches!(error, DeviceError::Transport(ref inner) if matches!(**inner, TransportError::Read { .. }));
    assert!(error.is_communication_failure());
    server.await??;
    Ok(())
}

#[tokio::test]
async fn refused_connection_is_a_connect_error() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let address = listener.local_addr()?.to_string();
    drop(listener);
    let transport = TcpTransport::new(
        address.clone(),
        options(Duration::from_secs(3), Duration::ZERO),
    );

    let error = transport
        .send(CommandFrame::bare(Opcode::GetStatus), 17)
        .await
        .expect_err("closed port should refuse");

    assert_matches!(error, TransportError::Connect { address: ref failed, .. } if *failed == address);
    Ok(())
}
