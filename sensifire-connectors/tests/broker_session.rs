//! MQTT sessions against a scripted in-process broker
//!
//! The broker is a bare `TcpListener` that speaks just enough MQTT 3.1.1 for
//! one exchange: read CONNECT, answer CONNACK, optionally acknowledge
//! PUBLISH packets, then behave as the test asks.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use sensifire_connectors::{MqttConfig, MqttConnector};
use sensifire_core::{ConnectError, PublishError, QoS, Session, SessionManager, SessionState};

const CONNECT: u8 = 0x10;
const PUBLISH: u8 = 0x30;
const DISCONNECT: [u8; 2] = [0xE0, 0x00];

/// What the broker does after the handshake
#[derive(Clone, Copy)]
enum Script {
    /// Acknowledge `n` publishes, then hold the socket open
    Ack(usize),
    /// Swallow publishes without acknowledging
    Silent,
    /// Close the socket right away
    Hangup,
    /// Send DISCONNECT, then keep the socket open
    Disconnect,
}

struct Received {
    topic: String,
    payload: Vec<u8>,
    qos: u8,
}

fn read_packet(stream: &mut TcpStream) -> std::io::Result<(u8, Vec<u8>)> {
    let mut header = [0u8; 1];
    stream.read_exact(&mut header)?;

    let mut len = 0usize;
    let mut shift = 0;
    loop {
        let mut byte = [0u8; 1];
        stream.read_exact(&mut byte)?;
        len |= usize::from(byte[0] & 0x7F) << shift;
        if byte[0] & 0x80 == 0 {
            break;
        }
        shift += 7;
    }

    let mut body = vec![0u8; len];
    stream.read_exact(&mut body)?;
    Ok((header[0], body))
}

fn parse_publish(header: u8, body: &[u8]) -> (Received, Option<[u8; 2]>) {
    let qos = (header >> 1) & 0x03;
    let topic_len = usize::from(u16::from_be_bytes([body[0], body[1]]));
    let topic = String::from_utf8(body[2..2 + topic_len].to_vec()).unwrap();
    let mut rest = &body[2 + topic_len..];

    let pkid = if qos > 0 {
        let id = [rest[0], rest[1]];
        rest = &rest[2..];
        Some(id)
    } else {
        None
    };

    (
        Received {
            topic,
            payload: rest.to_vec(),
            qos,
        },
        pkid,
    )
}

/// Start a broker on an ephemeral port; returns its port and what it received
fn spawn_broker(return_code: u8, script: Script) -> (u16, JoinHandle<Vec<Received>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        stream
            .set_read_timeout(Some(Duration::from_secs(5)))
            .unwrap();

        let (header, _) = read_packet(&mut stream).unwrap();
        assert_eq!(header & 0xF0, CONNECT);
        stream.write_all(&[0x20, 0x02, 0x00, return_code]).unwrap();

        let mut received = Vec::new();
        match script {
            Script::Hangup => return received,
            Script::Disconnect => {
                stream.write_all(&DISCONNECT).unwrap();
                let _ = read_packet(&mut stream);
            }
            Script::Ack(n) => {
                while received.len() < n {
                    let (header, body) = read_packet(&mut stream).unwrap();
                    if header & 0xF0 != PUBLISH {
                        continue;
                    }
                    let (msg, pkid) = parse_publish(header, &body);
                    if let Some([hi, lo]) = pkid {
                        stream.write_all(&[0x40, 0x02, hi, lo]).unwrap();
                    }
                    received.push(msg);
                }
                // Keep the session open until the client goes away
                let _ = read_packet(&mut stream);
            }
            Script::Silent => {
                while let Ok((header, body)) = read_packet(&mut stream) {
                    if header & 0xF0 == PUBLISH {
                        received.push(parse_publish(header, &body).0);
                    }
                }
            }
        }
        received
    });

    (port, handle)
}

fn config(port: u16) -> MqttConfig {
    MqttConfig::new("127.0.0.1", port)
        .client_id("sensifire-test")
        .connect_timeout_ms(2_000)
        .ack_timeout_ms(500)
}

#[test]
fn publishes_with_qos1_and_waits_for_ack() {
    let (port, broker) = spawn_broker(0, Script::Ack(2));
    let mut sessions = SessionManager::new(MqttConnector::new(config(port)));

    let handle = sessions.connect().unwrap();
    assert_eq!(handle.id(), 1);
    assert_eq!(sessions.state(), SessionState::Connected);
    assert!(sessions.is_alive());

    let payload = br#"{"temperature": 25.01, "co": 12.00}"#;
    sessions
        .publish("environment/sensordata", payload, QoS::AtLeastOnce, false)
        .unwrap();
    sessions
        .publish("environment/sensordata", payload, QoS::AtLeastOnce, false)
        .unwrap();

    drop(sessions);
    let received = broker.join().unwrap();

    assert_eq!(received.len(), 2);
    assert_eq!(received[0].topic, "environment/sensordata");
    assert_eq!(received[0].qos, 1);
    assert_eq!(received[0].payload, payload.to_vec());
}

#[test]
fn refused_connack_reports_return_code() {
    let (port, broker) = spawn_broker(5, Script::Hangup);
    let mut sessions = SessionManager::new(MqttConnector::new(config(port)));

    assert_eq!(sessions.connect(), Err(ConnectError::Refused { code: 5 }));
    assert_eq!(sessions.state(), SessionState::Disconnected);
    broker.join().unwrap();
}

#[test]
fn silent_listener_times_out_connect() {
    // Accepts TCP but never answers CONNECT
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let mut sessions =
        SessionManager::new(MqttConnector::new(config(port).connect_timeout_ms(300)));

    assert_eq!(
        sessions.connect(),
        Err(ConnectError::Timeout { timeout_ms: 300 })
    );
    assert_eq!(sessions.state(), SessionState::Disconnected);
    drop(listener);
}

#[test]
fn closed_port_fails_connect() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let mut sessions = SessionManager::new(MqttConnector::new(config(port)));

    assert!(sessions.connect().is_err());
    assert_eq!(sessions.state(), SessionState::Disconnected);
}

#[test]
fn missing_ack_times_out_publish() {
    let (port, broker) = spawn_broker(0, Script::Silent);
    let mut connector = MqttConnector::new(config(port));

    let mut session = sensifire_core::Connector::connect(&mut connector).unwrap();
    let result = session.publish("environment/sensordata", b"{}", QoS::AtLeastOnce, false);

    assert_eq!(result, Err(PublishError::AckTimeout { timeout_ms: 500 }));

    drop(session);
    assert_eq!(broker.join().unwrap().len(), 1);
}

#[test]
fn hangup_is_detected_and_sticks() {
    let (port, broker) = spawn_broker(0, Script::Hangup);
    let mut sessions = SessionManager::new(MqttConnector::new(config(port)));

    sessions.connect().unwrap();
    broker.join().unwrap();

    let mut alive = true;
    for _ in 0..50 {
        if !sessions.is_alive() {
            alive = false;
            break;
        }
        thread::sleep(Duration::from_millis(20));
    }

    assert!(!alive, "closed socket never noticed");
    assert_eq!(sessions.state(), SessionState::Disconnected);
    assert_eq!(
        sessions.publish("environment/sensordata", b"{}", QoS::AtLeastOnce, false),
        Err(PublishError::NotConnected)
    );
}

#[test]
fn broker_disconnect_kills_session_for_good() {
    let (port, broker) = spawn_broker(0, Script::Disconnect);
    let mut connector = MqttConnector::new(config(port));
    let mut session = sensifire_core::Connector::connect(&mut connector).unwrap();

    let mut alive = true;
    for _ in 0..50 {
        if !session.is_alive() {
            alive = false;
            break;
        }
        thread::sleep(Duration::from_millis(20));
    }
    assert!(!alive, "DISCONNECT never noticed");

    // Sticky: no later poll revives it
    thread::sleep(Duration::from_millis(50));
    assert!(!session.is_alive());
    assert_eq!(
        session.publish("environment/sensordata", b"{}", QoS::AtLeastOnce, false),
        Err(PublishError::NotConnected)
    );

    drop(session);
    assert!(broker.join().unwrap().is_empty());
}
