mod analytics;
mod registration;
mod session;
mod speaker;

pub use analytics::*;
pub use registration::*;
pub use session::*;
pub use speaker::*;
