//! Gesture-driven spellcasting core for hand-tracked VR.
//!
//! The crate turns raw hand tracking from interchangeable devices into a
//! device-agnostic hand model, evaluates pose-triple gestures against it,
//! and drives spell lifecycles with mana accounting and targeting. The
//! embedding engine supplies scene queries through [`aim::Scene`] and
//! receives typed effect commands through the sinks in [`collab`].

pub mod aim;
pub mod collab;
pub mod gesture;
pub mod hand;
pub mod player;
pub mod query;
pub mod session;
pub mod spell;
pub mod tracking;

pub use player::PlayerFrame;
pub use query::HandQuery;
pub use session::{Session, SessionConfig};
pub use tracking::DeviceKind;
