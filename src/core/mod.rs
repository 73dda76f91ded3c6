pub mod legacy;
pub mod log;
pub mod report;
