//! puplink Simulator Binary
//!
//! Interactive simulator for exercising the command channel without a
//! radio or a robot. Stdin lines are delivered to the channel as raw
//! writes; `/connect`, `/disconnect`, and `/quit` drive the lifecycle.

use std::io::{self, BufRead};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use clap::Parser;
use parking_lot::Mutex;
use tracing_subscriber::{fmt, EnvFilter};

use puplink::transport::{ConnectionHandle, Transport};
use puplink::{CommandChannel, Config, RobotHandlers};

/// Crawl stance the simulated robot parks in
const STANCE: [f32; 4] = [270.0, 90.0, 90.0, 270.0];

/// puplink Simulator
#[derive(Parser, Debug)]
#[command(name = "puplink-sim")]
#[command(about = "Interactive simulator for the quadruped command channel")]
#[command(version)]
struct Args {
    /// Advertised device name
    #[arg(short, long, default_value = "MicroPupper")]
    device_name: String,

    /// Reassembly buffer capacity in bytes
    #[arg(short, long, default_value = "2048")]
    capacity: usize,

    /// Emit position telemetry every N ms (0 disables)
    #[arg(short, long, default_value = "0")]
    state_interval_ms: u64,
}

/// Simulated robot tracking the four leg angles
struct SimRobot {
    legs: Arc<Mutex<[f32; 4]>>,
}

impl SimRobot {
    fn new() -> Self {
        SimRobot {
            legs: Arc::new(Mutex::new(STANCE)),
        }
    }

    fn legs(&self) -> Arc<Mutex<[f32; 4]>> {
        Arc::clone(&self.legs)
    }
}

impl RobotHandlers for SimRobot {
    fn on_move(&mut self, fr: f32, fl: f32, br: f32, bl: f32, speed: u16) {
        *self.legs.lock() = [fr, fl, br, bl];
        println!(
            "== legs ({:.0}, {:.0}, {:.0}, {:.0}) at speed {}",
            fr, fl, br, bl, speed
        );
    }

    fn on_move_single(&mut self, id: u8, angle: f32, speed: u16) {
        let mut legs = self.legs.lock();
        match legs.get_mut(id as usize) {
            Some(leg) => {
                *leg = angle;
                println!("== servo {} to {:.0} at speed {}", id, angle, speed);
            }
            None => println!("== no servo {}", id),
        }
    }

    fn on_stance(&mut self) {
        *self.legs.lock() = STANCE;
        println!("== stance");
    }

    fn on_connection_change(&mut self, connected: bool) {
        if connected {
            // Park in a safe pose before the client starts driving.
            *self.legs.lock() = STANCE;
            println!("== connected, parked in stance");
        } else {
            println!("== disconnected");
        }
    }
}

/// Transport that prints every notify to stdout
struct ConsoleTransport;

impl Transport for ConsoleTransport {
    fn notify(&mut self, payload: &[u8]) -> puplink::Result<()> {
        println!("<- {}", String::from_utf8_lossy(payload));
        Ok(())
    }

    fn resume_advertising(&mut self) -> puplink::Result<()> {
        println!("-- advertising");
        Ok(())
    }
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,puplink=debug"));

    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();

    tracing::info!("puplink simulator v{}", puplink::VERSION);
    tracing::info!("Device name: {}", args.device_name);

    let config = Config::builder()
        .device_name(&args.device_name)
        .reassembly_capacity(args.capacity)
        .build();

    let robot = SimRobot::new();
    let legs = robot.legs();

    let mut channel = match CommandChannel::open(config, robot, ConsoleTransport) {
        Ok(channel) => channel,
        Err(e) => {
            tracing::error!("Failed to open channel: {}", e);
            std::process::exit(1);
        }
    };

    // Optional telemetry loop on its own thread, sharing the outbound
    // state through a notifier clone
    if args.state_interval_ms > 0 {
        let notifier = channel.notifier();
        let interval = Duration::from_millis(args.state_interval_ms);
        thread::spawn(move || loop {
            thread::sleep(interval);
            let [fr, fl, br, bl] = *legs.lock();
            notifier.send_state(fr, fl, br, bl);
        });
    }

    println!("commands: /connect /disconnect /quit, anything else is a raw write");

    let mut next_handle: u16 = 1;
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::error!("stdin error: {}", e);
                break;
            }
        };
        let line = line.trim();
        match line {
            "" => {}
            "/quit" => break,
            "/connect" => {
                channel.handle_connect(ConnectionHandle(next_handle));
                next_handle = next_handle.wrapping_add(1);
            }
            "/disconnect" => channel.handle_disconnect(),
            _ => channel.handle_write(line.as_bytes()),
        }
    }

    tracing::info!("Simulator stopped");
}
