pub mod identity;
pub mod models;
pub mod result;

pub use identity::{IdentityError, RequestStamp, TokenIdentity};
pub use result::{ErrorKind, FetchStatus, ProviderResult, SlotView};
