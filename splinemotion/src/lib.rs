//! Timeline-driven locomotion along precomputed paths.
//!
//! A movement track chains its clips into one continuous path interval, samples every weighted
//! clip each tick and resolves a single progress/speed pair that places and orients a subject.
//! Path geometry and the subject are supplied by the host through [`PathEvaluator`] and
//! [`Subject`].

#![forbid(unsafe_code)]

mod clock;
mod config;
mod error;
mod model;
mod path;
mod runtime;
mod subject;
mod version;

#[cfg(feature = "json")]
pub mod json;

pub use clock::*;
pub use config::*;
pub use error::*;
pub use model::*;
pub use path::*;
pub use runtime::*;
pub use subject::*;
pub use version::*;

#[cfg(test)]
mod path_tests;


#[cfg(all(test, feature = "json"))]
mod json_tests;
