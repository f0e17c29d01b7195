//! Simulated device demo.
//!
//! Runs a full session against a fake traffic-light board living on the
//! other end of an in-memory duplex stream. The fake board cycles through
//! its modes and indicator patterns while echoing back every command line
//! it receives, so you can watch both directions of the protocol without
//! hardware attached.
//!
//! ```sh
//! cargo run --example simulated_device
//! ```

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream};

use lightlink::transport::StreamTransport;
use lightlink::{ControlValues, LinkConfig, LinkSession, SharedControls};

/// Device half: emit telemetry every 100ms, log received command lines.
async fn run_device(stream: DuplexStream) {
    let (read_half, mut write_half) = tokio::io::split(stream);
    let mut commands = BufReader::new(read_half).lines();

    let emitter = tokio::spawn(async move {
        let modes = ["Default", "PCINT1", "PCINT2", "PCINT3", "Default"];
        let patterns = [[1u8, 0, 0], [0, 1, 0], [0, 0, 1], [1, 1, 1], [0, 0, 0]];

        for step in 0u32.. {
            let idx = (step as usize) % modes.len();
            let line = format!(
                "B: {} M: {} O: {},{},{}\n",
                (step * 16) % 256,
                modes[idx],
                patterns[idx][0],
                patterns[idx][1],
                patterns[idx][2],
            );
            if write_half.write_all(line.as_bytes()).await.is_err() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    });

    while let Ok(Some(line)) = commands.next_line().await {
        println!("[device] received command: {}", line);
    }
    emitter.abort();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> lightlink::Result<()> {
    let (host_stream, device_stream) = tokio::io::duplex(1024);
    let device = tokio::spawn(run_device(device_stream));

    let controls = SharedControls::with_values(ControlValues::new(2000, 500, 2000));
    let mut session = LinkSession::connect(
        StreamTransport::new(host_stream),
        LinkConfig::default(),
        controls.clone(),
    )
    .await?;

    let mut events = session.subscribe();
    for _ in 0..20 {
        if let Some(snapshot) = events.recv().await {
            println!(
                "[host] brightness {:>3}  mode {:<7}  indicators {:?}",
                snapshot.brightness, snapshot.mode, snapshot.indicators
            );
        }
        // Nudge the sliders so the outbound side has something new to say.
        let current = controls.get();
        controls.set(ControlValues::new(
            current.red + 10,
            current.yellow,
            current.green,
        ));
    }

    session.close();
    let result = session.wait_for_shutdown().await;
    device.abort();
    result
}
