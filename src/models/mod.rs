pub mod envelope;
pub mod notification;
pub mod organization;

pub use envelope::*;
pub use notification::*;
pub use organization::*;
