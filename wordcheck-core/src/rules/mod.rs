// Scanners run per block. Each submodule is a pure function of the block
// text; engine.rs wires them together and hands results to the report
// aggregator.

pub mod capitalization;
pub mod distance;
pub mod engine;
pub mod lexical;
pub mod matching;
pub mod phrases;
pub mod spelling;

pub use engine::{BlockFindings, RuleEngine};
