pub mod compose;
pub mod config;
pub mod logging;
pub mod mastery;
pub mod rounds;
pub mod session;
pub mod storage;
