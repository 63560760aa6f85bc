//! Full connection lifecycle against a real subprocess source.
//!
//! Uses `sh` as the interpreter so the tests run without any device
//! attached. The script prints a few telemetry lines and exits; the exit is
//! expected to surface as a reader failure that sends the connection back
//! to Disconnected.

#![cfg(unix)]

use serialvis_rs::{
    config::AppConfig, connection::Connection, connection::ConnectionState,
    source::ProcessSource,
};
use std::io::Write;
use std::time::{Duration, Instant};

fn shell_config() -> AppConfig {
    AppConfig {
        interpreter: "sh".to_string(),
        poll_interval_ms: 1,
        ..AppConfig::default()
    }
}

#[test]
fn script_output_is_plotted_until_exit() {
    let mut script = tempfile::NamedTempFile::new().unwrap();
    writeln!(script, "printf 'Temp: 23.50, Hum: 61.10\\nTemp: 24.00, Hum: 60.00\\n'").unwrap();
    script.flush().unwrap();

    let config = shell_config();
    let mut connection = Connection::new();
    let source = ProcessSource::new(&config.interpreter, script.path());

    let mut pipeline = connection
        .connect("Temp: ${temp}, Hum: ${humidity}", Box::new(source), &config)
        .unwrap();
    assert_eq!(connection.state(), ConnectionState::Connected);

    // Drain frames until the reader reports the child's exit.
    let events = connection.events().unwrap().clone();
    let deadline = Instant::now() + Duration::from_secs(5);
    let failure = loop {
        if let Some(failure) = pipeline.drain(&events) {
            break failure;
        }
        assert!(Instant::now() < deadline, "reader never reported exit");
        std::thread::sleep(Duration::from_millis(5));
    };
    assert!(!failure.is_empty());

    connection.disconnect();
    assert_eq!(connection.state(), ConnectionState::Disconnected);

    let store = pipeline.store();
    assert_eq!(store.len(), 2);
    let temp: Vec<f64> = store.series()[0].values().collect();
    let hum: Vec<f64> = store.series()[1].values().collect();
    assert_eq!(temp, vec![23.50, 24.00]);
    assert_eq!(hum, vec![61.10, 60.00]);
    assert_eq!(pipeline.log().len(), 2);
}

#[test]
fn spawn_failure_returns_to_disconnected() {
    let config = shell_config();
    let mut connection = Connection::new();
    let source = ProcessSource::new(&config.interpreter, "/no/such/script.sh");

    let result = connection.connect("v=${v}", Box::new(source), &config);
    assert!(result.is_err());
    assert_eq!(connection.state(), ConnectionState::Disconnected);
}

#[test]
fn long_running_script_stops_on_disconnect() {
    let mut script = tempfile::NamedTempFile::new().unwrap();
    // Emits one line, then blocks far longer than the test runs.
    writeln!(script, "echo 'v=1.0'; sleep 600").unwrap();
    script.flush().unwrap();

    let config = shell_config();
    let mut connection = Connection::new();
    let source = ProcessSource::new(&config.interpreter, script.path());

    let mut pipeline = connection
        .connect("v=${v}", Box::new(source), &config)
        .unwrap();

    let events = connection.events().unwrap().clone();
    let deadline = Instant::now() + Duration::from_secs(5);
    while pipeline.store().is_empty() {
        assert!(Instant::now() < deadline, "line never arrived");
        pipeline.drain(&events);
        std::thread::sleep(Duration::from_millis(5));
    }

    connection.disconnect();
    assert_eq!(connection.state(), ConnectionState::Disconnected);
}
