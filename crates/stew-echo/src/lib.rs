//! The echo action body and the normalization it shares with the replay
//! checker.
//!
//! Every generated action runs the same body: it writes one canonical line
//! per received argument into its first output, so a replay can assert the
//! exact value that crossed the host boundary.

pub mod function;
pub mod normalize;

pub use function::{disguise, EchoError, EchoFunction, OutputPayload, OutputShape, Signature};
pub use normalize::{canonical_line, normalize};
