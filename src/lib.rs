// Library exports for the cube-paint simulator
// This allows the driver, the replay tool and the tests to share the engine

pub mod config;
pub mod debug_logger;
pub mod engine;
pub mod error;
pub mod explorer;
pub mod field;
pub mod moves;
pub mod replay;
pub mod slots;
pub mod topology;
pub mod types;
