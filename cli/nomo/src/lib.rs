//! Form collection, configuration and request evaluation behind the `nomo`
//! command-line calculator.

pub mod collector;
pub mod config;
pub mod report;

pub use collector::{collect, collect_json, json_answers, parse_assignment, CollectError};
pub use config::{load_registry, Settings};
pub use report::{evaluate, AppError, Report};
