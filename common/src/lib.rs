pub mod consts;
pub mod logger;
pub mod utils;
pub mod version;

pub use logger::init_logger;
pub use version::VersionInfo;
