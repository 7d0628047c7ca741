pub mod config;
pub mod inspect;
pub mod lag;
pub mod logging;
pub mod parser;
pub mod version;
