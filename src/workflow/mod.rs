pub mod import_flow;

pub use import_flow::{ImportFlow, ImportOutcome};
