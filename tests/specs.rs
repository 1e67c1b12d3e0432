// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end specs: agent and gateway running in-process over real
//! loopback sockets, driven through the wire protocols like any client.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use tokio::io::BufReader;
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};

use pqm_agent::{Agent, AgentHandle, AgentOptions};
use pqm_core::{JobTableProvider, MemoryReportSink, MonitorConfig, PrintProvider, ReportSink};
use pqm_gateway::{Gateway, GatewayHandle, GatewayOptions};
use pqm_wire::{read_line, write_line};

const TIMEOUT: Duration = Duration::from_secs(2);

fn loopback() -> SocketAddr {
    SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0)
}

async fn spawn_agent(provider: Arc<JobTableProvider>, interval_secs: f64) -> AgentHandle {
    let mut config = MonitorConfig::default();
    config.set_interval_secs(interval_secs).unwrap();
    Agent::spawn(AgentOptions {
        bind_addr: loopback(),
        provider: provider as Arc<dyn PrintProvider>,
        report: Arc::new(MemoryReportSink::new()) as Arc<dyn ReportSink>,
        config,
        write_timeout: TIMEOUT,
    })
    .await
    .unwrap()
}

async fn spawn_gateway(provider: Arc<JobTableProvider>, agent_addr: SocketAddr) -> GatewayHandle {
    Gateway::spawn(GatewayOptions {
        bind_addr: loopback(),
        agent_addr,
        provider: provider as Arc<dyn PrintProvider>,
        relay_timeout: TIMEOUT,
        write_timeout: TIMEOUT,
    })
    .await
    .unwrap()
}

/// A client session holding one connection for sequential request/reply pairs.
struct Session {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl Session {
    async fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).await.unwrap();
        let (read_half, write_half) = stream.into_split();
        Self { reader: BufReader::new(read_half), writer: write_half }
    }

    async fn send(&mut self, line: &str) -> String {
        write_line(&mut self.writer, line, Some(TIMEOUT)).await.unwrap();
        read_line(&mut self.reader, Some(TIMEOUT)).await.unwrap().unwrap()
    }
}

/// Poll the agent protocol until the reported queue length changes from
/// `initial`, or panic after ~2s.
async fn wait_for_change(session: &mut Session, initial: &str) -> String {
    for _ in 0..100 {
        let reply = session.send("GetCountQueue:").await;
        if reply != initial {
            return reply;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("queue length never changed from {initial}");
}

#[tokio::test]
async fn aggregate_is_sum_over_configured_printers_and_stable_between_cycles() {
    let provider = JobTableProvider::new();
    provider.enqueue("HP");
    provider.enqueue("HP");
    provider.enqueue("Canon");
    let agent = spawn_agent(Arc::clone(&provider), 0.05).await;

    let mut session = Session::connect(agent.local_addr()).await;
    assert_eq!(session.send(r#"SetPrinters:["HP","Canon"]"#).await, "OK:PrintersSet");

    let reply = wait_for_change(&mut session, "QUEUE_LENGTH:0").await;
    assert_eq!(reply, "QUEUE_LENGTH:3");

    // Freeze the schedule, then change the world: the published aggregate
    // must stay at the last completed cycle's value.
    assert_eq!(session.send("SetInterval:3600").await, "OK:IntervalSet");
    tokio::time::sleep(Duration::from_millis(200)).await;
    provider.enqueue("HP");
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(session.send("GetCountQueue:").await, "QUEUE_LENGTH:3");

    agent.shutdown().await;
}

#[tokio::test]
async fn rejected_interval_updates_leave_previous_value_in_force() {
    let agent = spawn_agent(JobTableProvider::new(), 3600.0).await;
    let mut session = Session::connect(agent.local_addr()).await;

    assert_eq!(session.send("SetInterval:30").await, "OK:IntervalSet");
    assert!(session.send("SetInterval:0").await.starts_with("ERROR:IntervalNotSet - "));
    assert!(session.send("SetInterval:-5").await.starts_with("ERROR:IntervalNotSet - "));

    assert_eq!(agent.state().lock().config.interval(), Duration::from_secs(30));
    agent.shutdown().await;
}

#[tokio::test]
async fn malformed_printer_payload_is_rejected_and_list_unchanged() {
    let agent = spawn_agent(JobTableProvider::new(), 3600.0).await;
    let mut session = Session::connect(agent.local_addr()).await;

    assert_eq!(session.send(r#"SetPrinters:["Keep"]"#).await, "OK:PrintersSet");
    assert!(session.send("SetPrinters:{not a list").await.starts_with("ERROR:PrintersNotSet - "));

    assert_eq!(agent.state().lock().config.printers, vec!["Keep".to_string()]);
    agent.shutdown().await;
}

#[tokio::test]
async fn set_settings_relays_end_to_end() {
    let provider = JobTableProvider::new();
    let agent = spawn_agent(Arc::clone(&provider), 3600.0).await;
    let gateway = spawn_gateway(Arc::clone(&provider), agent.local_addr()).await;

    let mut client = Session::connect(gateway.local_addr()).await;
    let reply = client.send(r#"SET_SETTINGS;{"Printers":["A","B"],"Interval":30}"#).await;
    assert!(reply.starts_with("OK: "), "reply: {reply}");

    // A direct query to the agent shows the new configuration
    {
        let state = agent.state().lock();
        assert_eq!(state.config.printers, vec!["A".to_string(), "B".to_string()]);
        assert_eq!(state.config.interval(), Duration::from_secs(30));
    }

    gateway.shutdown().await;
    agent.shutdown().await;
}

#[tokio::test]
async fn set_settings_with_unreachable_agent_fails_and_agent_is_untouched() {
    let provider = JobTableProvider::new();

    // Gateway pointed at a port where nothing listens
    let dead = {
        let listener = tokio::net::TcpListener::bind(loopback()).await.unwrap();
        listener.local_addr().unwrap()
    };
    let gateway = spawn_gateway(Arc::clone(&provider), dead).await;

    let mut client = Session::connect(gateway.local_addr()).await;
    let reply = client.send(r#"SET_SETTINGS;{"Printers":["A","B"],"Interval":30}"#).await;
    assert!(reply.starts_with("ERROR: "), "reply: {reply}");
    gateway.shutdown().await;

    // An agent reachable afterwards is provably untouched
    let agent = spawn_agent(Arc::clone(&provider), 3600.0).await;
    assert!(agent.state().lock().config.printers.is_empty());
    agent.shutdown().await;
}

#[tokio::test]
async fn queue_length_query_is_forwarded_through_the_gateway() {
    let provider = JobTableProvider::new();
    provider.enqueue("HP");
    let agent = spawn_agent(Arc::clone(&provider), 0.05).await;
    let gateway = spawn_gateway(Arc::clone(&provider), agent.local_addr()).await;

    let mut agent_session = Session::connect(agent.local_addr()).await;
    assert_eq!(agent_session.send(r#"SetPrinters:["HP"]"#).await, "OK:PrintersSet");
    wait_for_change(&mut agent_session, "QUEUE_LENGTH:0").await;

    let mut client = Session::connect(gateway.local_addr()).await;
    assert_eq!(client.send("GetQueueLength").await, "QUEUE_LENGTH:1");

    gateway.shutdown().await;
    agent.shutdown().await;
}

#[tokio::test]
async fn concurrent_readers_never_observe_a_partial_sum() {
    let provider = JobTableProvider::new();
    for queue in ["A", "B", "C"] {
        provider.enqueue(queue);
    }
    let agent = spawn_agent(Arc::clone(&provider), 0.02).await;

    let mut session = Session::connect(agent.local_addr()).await;
    assert_eq!(session.send(r#"SetPrinters:["A","B","C"]"#).await, "OK:PrintersSet");

    // Hammer the agent from many connections while cycles run. Each
    // reply must be a completed aggregate: 0 (no cycle yet) or 3 —
    // never a partial 1 or 2.
    let addr = agent.local_addr();
    let readers: Vec<_> = (0..8)
        .map(|_| {
            tokio::spawn(async move {
                let mut session = Session::connect(addr).await;
                for _ in 0..50 {
                    let reply = session.send("GetCountQueue:").await;
                    assert!(
                        reply == "QUEUE_LENGTH:0" || reply == "QUEUE_LENGTH:3",
                        "partial aggregate observed: {reply}"
                    );
                }
            })
        })
        .collect();
    for reader in readers {
        reader.await.unwrap();
    }

    agent.shutdown().await;
}

#[tokio::test]
async fn get_printers_filters_suppressed_names_end_to_end() {
    let provider = JobTableProvider::new();
    provider.set_printers(vec![
        "Office_HP".into(),
        "Microsoft Print to PDF".into(),
        "Microsoft XPS Document Writer".into(),
        "Send To OneNote".into(),
        "Lobby_Canon".into(),
    ]);
    let agent = spawn_agent(Arc::clone(&provider), 3600.0).await;
    let gateway = spawn_gateway(Arc::clone(&provider), agent.local_addr()).await;

    let mut client = Session::connect(gateway.local_addr()).await;
    assert_eq!(client.send("GET_PRINTERS").await, "Office_HP;Lobby_Canon");

    gateway.shutdown().await;
    agent.shutdown().await;
}

#[tokio::test]
async fn unknown_verbs_leave_both_endpoints_usable() {
    let provider = JobTableProvider::new();
    let agent = spawn_agent(Arc::clone(&provider), 3600.0).await;
    let gateway = spawn_gateway(Arc::clone(&provider), agent.local_addr()).await;

    let mut agent_session = Session::connect(agent.local_addr()).await;
    assert_eq!(agent_session.send("Reboot:now").await, "ERROR:UnknownCommand");
    assert_eq!(agent_session.send("GetCountQueue:").await, "QUEUE_LENGTH:0");

    let mut client = Session::connect(gateway.local_addr()).await;
    assert_eq!(client.send("REBOOT").await, "ERROR:UnknownCommand");
    assert_eq!(client.send("GET_PRINTERS").await, "");

    gateway.shutdown().await;
    agent.shutdown().await;
}

#[tokio::test]
async fn shutdown_waits_for_open_connections_to_close() {
    let provider = JobTableProvider::new();
    let agent = spawn_agent(Arc::clone(&provider), 3600.0).await;
    let gateway = spawn_gateway(Arc::clone(&provider), agent.local_addr()).await;

    let mut agent_session = Session::connect(agent.local_addr()).await;
    assert_eq!(agent_session.send("GetCountQueue:").await, "QUEUE_LENGTH:0");
    let mut client = Session::connect(gateway.local_addr()).await;
    assert_eq!(client.send("GET_PRINTERS").await, "");

    gateway.shutdown().await;
    agent.shutdown().await;

    // Every connection task has exited by the time shutdown returns, so
    // the very next read sees the closed socket rather than a reply.
    for session in [&mut client, &mut agent_session] {
        let _ = write_line(&mut session.writer, "GetCountQueue:", Some(TIMEOUT)).await;
        let reply = read_line(&mut session.reader, Some(TIMEOUT)).await;
        assert!(!matches!(reply, Ok(Some(_))), "reply after shutdown: {reply:?}");
    }
}

#[tokio::test]
async fn shutdown_stops_accepting_new_connections() {
    let agent = spawn_agent(JobTableProvider::new(), 3600.0).await;
    let addr = agent.local_addr();
    agent.shutdown().await;

    let result = tokio::time::timeout(TIMEOUT, TcpStream::connect(addr)).await;
    match result {
        Ok(Ok(stream)) => {
            // Accepted by the OS backlog at worst; the listener is gone,
            // so the first read must see EOF or an error, not a reply.
            let (read_half, mut write_half) = stream.into_split();
            let mut reader = BufReader::new(read_half);
            let _ = write_line(&mut write_half, "GetCountQueue:", Some(TIMEOUT)).await;
            let reply = read_line(&mut reader, Some(TIMEOUT)).await;
            assert!(
                !matches!(reply, Ok(Some(_))),
                "listener answered after shutdown: {reply:?}"
            );
        }
        _ => {} // connection refused or timed out: listener is closed
    }
}
