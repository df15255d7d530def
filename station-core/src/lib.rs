//! Observation pipeline for a multi-sensor air-quality acquisition station.
//!
//! Five pieces, leaves first: a framed-transport codec ([`codec`]) under a
//! particulate sensor driver ([`driver`]), a pure statistics kernel
//! ([`stats`]) over samples buffered in fixed-capacity rings ([`ring`]),
//! and a state machine ([`fsm`]) that orchestrates reads against an
//! external clock ([`clock`]) and a window manager ([`window`]), persisting
//! closed windows through a sink ([`persistence`]).
//!
//! This crate owns no hardware and performs no I/O of its own; every
//! external collaborator — the clock, the sensor transport, the ambient
//! sensor, the persistence sink — is a trait implemented by the host.

pub mod clock;
pub mod codec;
pub mod constants;
pub mod datetime;
pub mod driver;
pub mod error;
pub mod fsm;
pub mod persistence;
pub mod ring;
pub mod sample;
pub mod stats;
pub mod transport;
pub mod window;

pub use clock::Clock;
pub use datetime::DateTime;
pub use driver::{Concentrations, ParticulateSensor};
pub use fsm::{ObservationMachine, State};
pub use persistence::{PersistenceSink, RawRecord, Resolution, StatRecord};
pub use ring::Ring;
pub use sample::Sample;
pub use transport::{AmbientReading, AmbientSensor, Delay, SensorTransport};
