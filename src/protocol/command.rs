//! Command definitions and parsing
//!
//! Two grammars share the inbound channel. The compact positional grammar
//! keeps writes small for the radio link:
//!
//! ```text
//! {"s":[fr,fl,br,bl,speed,(delay_ms)]}   move all four legs
//! {"m":[[...], [...], ...]}              ordered sequence of moves
//! {"p":<any>}                            ping
//! {"r":<any>}                            return to stance
//! ```
//!
//! The keyed grammar spells fields out and is selected by a `"cmd"`
//! discriminator, which is checked before any positional key:
//!
//! ```text
//! {"cmd":"servos","fr":90,"fl":90,"br":270,"bl":270,"speed":1000,"delay":100}
//! {"cmd":"servo","id":1,"angle":90,"speed":1000,"delay":100}
//! ```

use serde_json::{Map, Value};

use crate::error::{LinkError, Result};

/// Four-leg actuation request
///
/// Angles are unified degrees (right-side reversal happens in the servo
/// driver, not here). `delay_ms` is the pause the dispatcher inserts after
/// the move, before the next command is processed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveAll {
    pub fr: f32,
    pub fl: f32,
    pub br: f32,
    pub bl: f32,
    pub speed: u16,
    pub delay_ms: u16,
}

/// Single-servo actuation request (keyed grammar only)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveSingle {
    pub id: u8,
    pub angle: f32,
    pub speed: u16,
    pub delay_ms: u16,
}

/// A parsed command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Move all four legs at once
    MoveAll(MoveAll),

    /// Ordered batch of four-leg moves, each with its own delay
    MoveSequence(Vec<MoveAll>),

    /// Move one servo
    MoveSingle(MoveSingle),

    /// Liveness probe, answered without touching the robot
    Ping,

    /// Return to the neutral stance
    Stance,

    /// Matched no rule; logged and dropped by the dispatcher
    Unknown,
}

impl Command {
    /// Parse one complete message.
    ///
    /// Fails only when the bytes are not JSON at all; a well-formed message
    /// that matches no grammar rule parses as `Command::Unknown`.
    pub fn parse(data: &[u8]) -> Result<Command> {
        let value: Value = serde_json::from_slice(data)
            .map_err(|e| LinkError::Protocol(format!("invalid command JSON: {}", e)))?;
        Ok(Self::from_value(&value))
    }

    /// Interpret one already-parsed message.
    ///
    /// Keys are tested in priority order and the first conforming match
    /// wins: `cmd`, then `s`, `m`, `p`, `r`. A key that is present but
    /// fails its shape test is not a match and testing continues down the
    /// list.
    pub fn from_value(value: &Value) -> Command {
        let Some(obj) = value.as_object() else {
            return Command::Unknown;
        };

        if let Some(discriminator) = obj.get("cmd") {
            return keyed_command(obj, discriminator);
        }
        if let Some(move_all) = obj.get("s").and_then(move_from_array) {
            return Command::MoveAll(move_all);
        }
        if let Some(items) = obj.get("m").and_then(Value::as_array) {
            // Malformed entries are skipped rather than aborting the batch.
            let moves = items.iter().filter_map(move_from_array).collect();
            return Command::MoveSequence(moves);
        }
        if obj.contains_key("p") {
            return Command::Ping;
        }
        if obj.contains_key("r") {
            return Command::Stance;
        }
        Command::Unknown
    }
}

/// Decode one `[fr, fl, br, bl, speed, (delay_ms)]` array.
///
/// Conforming means at least five leading numbers. The optional sixth
/// element is the post-move delay; absent or non-numeric reads as zero.
/// Elements past the sixth are ignored.
fn move_from_array(value: &Value) -> Option<MoveAll> {
    let arr = value.as_array()?;
    if arr.len() < 5 {
        return None;
    }

    let mut nums = [0f64; 5];
    for (slot, item) in nums.iter_mut().zip(arr.iter()) {
        *slot = item.as_f64()?;
    }
    let delay = arr.get(5).and_then(Value::as_f64).unwrap_or(0.0);

    Some(MoveAll {
        fr: nums[0] as f32,
        fl: nums[1] as f32,
        br: nums[2] as f32,
        bl: nums[3] as f32,
        speed: nums[4] as u16,
        delay_ms: delay as u16,
    })
}

/// Decode a keyed-grammar command once `"cmd"` was seen.
///
/// A non-string discriminator, an unrecognized verb, or a recognized verb
/// with missing/mistyped required fields all decode as `Unknown`; the
/// positional keys are never consulted once `"cmd"` is present.
fn keyed_command(obj: &Map<String, Value>, discriminator: &Value) -> Command {
    let Some(verb) = discriminator.as_str() else {
        return Command::Unknown;
    };
    match verb {
        "servos" => match all_servos(obj) {
            Some(move_all) => Command::MoveAll(move_all),
            None => Command::Unknown,
        },
        "servo" => match one_servo(obj) {
            Some(move_single) => Command::MoveSingle(move_single),
            None => Command::Unknown,
        },
        _ => Command::Unknown,
    }
}

fn all_servos(obj: &Map<String, Value>) -> Option<MoveAll> {
    Some(MoveAll {
        fr: number(obj, "fr")? as f32,
        fl: number(obj, "fl")? as f32,
        br: number(obj, "br")? as f32,
        bl: number(obj, "bl")? as f32,
        speed: number(obj, "speed")? as u16,
        delay_ms: number(obj, "delay").unwrap_or(0.0) as u16,
    })
}

fn one_servo(obj: &Map<String, Value>) -> Option<MoveSingle> {
    let id = obj.get("id")?.as_u64().and_then(|v| u8::try_from(v).ok())?;
    Some(MoveSingle {
        id,
        angle: number(obj, "angle")? as f32,
        speed: number(obj, "speed")? as u16,
        delay_ms: number(obj, "delay").unwrap_or(0.0) as u16,
    })
}

fn number(obj: &Map<String, Value>, key: &str) -> Option<f64> {
    obj.get(key)?.as_f64()
}
