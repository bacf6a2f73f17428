//! [`InputDriver`](crate::application::driver::InputDriver) implementations.
//!
//! - `headless`: virtual display used by the binary.
//! - `safety`: fail-safe and pause wrapper around any driver.
//! - `mock`: call recorder for tests.

pub mod headless;
pub mod mock;
pub mod safety;

pub use headless::HeadlessDriver;
pub use safety::SafetyDriver;
