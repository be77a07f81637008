//! Terminal counterpart of the browser client: talks to the proxy and
//! keeps a per-topic transcript on disk.

mod proxy;
mod session;
mod store;

pub use proxy::ProxyClient;
pub use session::{ChatSession, Outcome};
pub use store::{Persisted, TranscriptStore};
