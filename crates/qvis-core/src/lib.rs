#![forbid(unsafe_code)]

//! Core: operations, operands, configuration and errors for qvis.
//!
//! # Role in qvis
//! `qvis-core` holds the value types every layout stage shares. It has no
//! layout logic of its own; `qvis-layout` consumes these types and turns a
//! scheduled operation list into a renderable cycle layout.
//!
//! # Primary responsibilities
//! - **Operation / Operand**: scheduled events and the rows they touch.
//! - **EndPoints**: inclusive cycle ranges (cut ranges, pulse spans).
//! - **Channel**: the per-qubit sub-lines used in pulse mode.
//! - **LayoutConfig**: serde-deserializable options with clamp-on-validate.
//! - **LayoutError**: the fatal input errors.

pub mod channel;
pub mod config;
pub mod error;
pub mod operand;
pub mod operation;
pub mod range;

pub use channel::Channel;
pub use config::{CuttingConfig, CycleConfig, GridConfig, LayoutConfig, PulseConfig};
pub use error::LayoutError;
pub use operand::{BitKind, Operand, RowSpan};
pub use operation::{MAX_CYCLE_INDEX, MAX_ROW_INDEX, Operation};
pub use range::EndPoints;
