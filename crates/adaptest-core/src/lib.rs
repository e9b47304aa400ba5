//! adaptest-core — adaptive testing engine.
//!
//! This crate holds the item response model, the ability estimator, the
//! item selector and the session controller that drive an adaptive quiz,
//! along with item bank parsing and configuration.

pub mod config;
pub mod engine;
pub mod error;
pub mod estimation;
pub mod input;
pub mod irt;
pub mod model;
pub mod parser;
pub mod report;
pub mod responders;
pub mod selection;
pub mod traits;

pub use engine::{Session, SessionConfig, SessionOutcome, SessionState};
pub use error::{CatError, CatResult};
pub use model::{Item, ItemBank, ItemId, ItemParams, Outcome};
