//! puplink Chunk Binary
//!
//! Splits one JSON message into chunk envelope lines, ready to paste into
//! a generic BLE console or the simulator one write at a time.

use std::io::{self, Read};

use clap::Parser;

use puplink::protocol::split_message;

/// puplink Chunker
#[derive(Parser, Debug)]
#[command(name = "puplink-chunk")]
#[command(about = "Split a JSON message into chunk envelope lines")]
#[command(version)]
struct Args {
    /// Message to split; reads stdin when omitted
    message: Option<String>,

    /// Maximum payload bytes per chunk
    #[arg(short, long, default_value = "120")]
    size: usize,
}

fn main() {
    let args = Args::parse();

    let message = match args.message {
        Some(message) => message,
        None => {
            let mut buf = String::new();
            if let Err(e) = io::stdin().read_to_string(&mut buf) {
                eprintln!("error: cannot read stdin: {}", e);
                std::process::exit(1);
            }
            buf
        }
    };
    let message = message.trim_end_matches(['\r', '\n']);

    let envelopes = match split_message(message, args.size) {
        Ok(envelopes) => envelopes,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    if envelopes.is_empty() {
        eprintln!("error: empty message");
        std::process::exit(1);
    }

    for envelope in &envelopes {
        match serde_json::to_string(envelope) {
            Ok(line) => println!("{}", line),
            Err(e) => {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
    }
}
