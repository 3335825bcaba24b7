//! Endless-runner game core.
//!
//! The simulation (`session`) is a plain stepping function over an owned
//! state struct; rendering, audio and terminal input are thin layers around
//! it so the whole game can be driven from tests without a display.

pub mod collision;
pub mod config;
pub mod error;
pub mod geometry;
pub mod input;
pub mod obstacle;
pub mod player;
pub mod render;
pub mod score;
pub mod session;
pub mod sound;
pub mod spawner;

pub use config::{BirdRule, GameConfig};
pub use error::{Error, Result};
pub use input::{InputEvent, InputSnapshot, Intent};
pub use session::{Cue, Session, SessionState, StepOutcome};
