pub mod backends;
pub mod batch;
pub mod engine;
pub mod error;
pub mod extract;

pub use batch::{read_criteria_table, BatchDriver, BatchInput};
pub use engine::{invoke, parse_engine_output, EngineOptions, EngineRequest, SliceEngine};
pub use error::SliceError;
pub use extract::extract_source;
