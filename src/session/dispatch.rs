//! Command dispatch
//!
//! Maps parsed commands onto the robot handlers and produces the reply the
//! wire format calls for. Delays ride on the calling thread: a step's
//! `delay_ms` blocks right here, which is what paces multi-step sequences
//! and holds off the next inbound write until the move has had its time.

use std::thread;
use std::time::Duration;

use tracing::debug;

use crate::handler::RobotHandlers;
use crate::protocol::{Command, MoveAll, Reply};

/// Run one command against the handlers, blocking through its delays.
/// Returns the reply to notify, if the command calls for one.
pub fn dispatch<H: RobotHandlers>(handlers: &mut H, command: Command) -> Option<Reply> {
    match command {
        Command::MoveAll(step) => {
            run_step(handlers, &step);
            None
        }
        Command::MoveSequence(steps) => {
            debug!(steps = steps.len(), "running move sequence");
            for step in &steps {
                run_step(handlers, step);
            }
            Some(Reply::Ok)
        }
        Command::MoveSingle(step) => {
            debug!(?step, "moving one servo");
            handlers.on_move_single(step.id, step.angle, step.speed);
            pause(step.delay_ms);
            None
        }
        Command::Ping => Some(Reply::Pong),
        Command::Stance => {
            debug!("returning to stance");
            handlers.on_stance();
            Some(Reply::Ok)
        }
        Command::Unknown => None,
    }
}

fn run_step<H: RobotHandlers>(handlers: &mut H, step: &MoveAll) {
    debug!(?step, "moving all servos");
    handlers.on_move(step.fr, step.fl, step.br, step.bl, step.speed);
    pause(step.delay_ms);
}

fn pause(delay_ms: u16) {
    if delay_ms > 0 {
        thread::sleep(Duration::from_millis(u64::from(delay_ms)));
    }
}
