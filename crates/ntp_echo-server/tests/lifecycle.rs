// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

mod common;

use std::io;
use std::time::{Duration, Instant};

use common::{TEST_POLL_INTERVAL, build_client_packet, send_receive_raw, spawn_test_server};
use echo_server::server::NtpEchoServer;
use tokio::sync::oneshot;

#[tokio::test]
async fn shutdown_joins_within_poll_interval() {
    let handle = spawn_test_server(NtpEchoServer::builder()).await;

    let started = Instant::now();
    handle.shutdown().await.unwrap();
    // One poll interval plus scheduling slack.
    assert!(started.elapsed() < TEST_POLL_INTERVAL + Duration::from_millis(500));
}

#[tokio::test]
async fn shutdown_with_slow_poll_interval_is_still_prompt() {
    let server = NtpEchoServer::builder()
        .listen("127.0.0.1:0")
        .poll_interval(Duration::from_secs(30))
        .build()
        .await
        .unwrap();
    let handle = server.spawn();

    let started = Instant::now();
    tokio::time::timeout(Duration::from_secs(2), handle.shutdown())
        .await
        .expect("shutdown waited for the full poll interval")
        .unwrap();
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn no_replies_after_shutdown() {
    let handle = spawn_test_server(NtpEchoServer::builder()).await;
    let addr = handle.local_addr();
    handle.shutdown().await.unwrap();

    let resp = send_receive_raw(addr, &build_client_packet(1), Duration::from_millis(300)).await;
    assert!(resp.is_none());
}

#[tokio::test]
async fn run_until_serves_then_stops_on_trigger() {
    let server = NtpEchoServer::builder()
        .listen("127.0.0.1:0")
        .poll_interval(TEST_POLL_INTERVAL)
        .build()
        .await
        .unwrap();
    let addr = server.local_addr();
    let (stop_tx, stop_rx) = oneshot::channel::<()>();

    let running = tokio::spawn(server.run_until(async {
        let _ = stop_rx.await;
        Ok(())
    }));

    let resp = send_receive_raw(addr, &build_client_packet(5), Duration::from_secs(2)).await;
    assert!(resp.is_some());

    stop_tx.send(()).unwrap();
    tokio::time::timeout(Duration::from_secs(2), running)
        .await
        .expect("run_until did not return")
        .unwrap()
        .unwrap();
}

#[tokio::test]
async fn run_until_reports_trigger_failure_and_still_stops() {
    let server = NtpEchoServer::builder()
        .listen("127.0.0.1:0")
        .poll_interval(TEST_POLL_INTERVAL)
        .build()
        .await
        .unwrap();
    let addr = server.local_addr();

    let err = tokio::time::timeout(
        Duration::from_secs(2),
        server.run_until(async { Err(io::Error::other("no signal handler")) }),
    )
    .await
    .expect("run_until did not return")
    .unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::Other);
    assert_eq!(err.to_string(), "no signal handler");

    // Both stages were joined, so the port is free again.
    assert!(tokio::net::UdpSocket::bind(addr).await.is_ok());
}

#[tokio::test]
async fn dropped_handle_stops_stages() {
    let handle = spawn_test_server(NtpEchoServer::builder()).await;
    let addr = handle.local_addr();
    drop(handle);

    // Once both stages exit the socket is closed and the port can be rebound.
    let deadline = Instant::now() + Duration::from_secs(2);
    loop {
        if tokio::net::UdpSocket::bind(addr).await.is_ok() {
            break;
        }
        assert!(Instant::now() < deadline, "socket still held after drop");
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}
