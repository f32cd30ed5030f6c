pub mod logging;
pub mod output;
pub mod percentage;
pub mod runtime;
pub mod time;
