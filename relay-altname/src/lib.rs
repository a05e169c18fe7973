pub mod dispatcher;
#[cfg(feature = "mock")]
pub mod mock;
pub mod placeholder;
pub mod resolver;
pub mod scheme;

pub use dispatcher::Dispatcher;
pub use placeholder::PlaceholderResolver;
pub use resolver::{NamingResolver, Resolution};
pub use scheme::{classify, NamingScheme};
