pub mod src_slicer;

pub use src_slicer::{resolve_engine_path, SrcSlicerEngine, ENGINE_ENV_VAR};
