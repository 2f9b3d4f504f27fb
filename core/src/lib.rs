pub mod derived;
pub mod endpoint;
pub mod global;
pub mod probe;
pub mod settings;
pub mod validate;

pub use derived::{MasterServer, Scheme};
pub use endpoint::{EndpointKey, EndpointTable};
pub use settings::Settings;
pub use validate::{Issue, Severity, validate};
