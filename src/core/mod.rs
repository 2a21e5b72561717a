pub mod clock;
pub mod light;
pub mod log;
pub mod queue;
