//! Persist objects larger than a single property value across scoped
//! property stores.

pub mod chunked;
pub mod scope;
pub mod store;

pub use chunked::{CHUNK_SIZE, chunk_substr, get_from_props, put_in_props};
pub use scope::{ClearReport, Properties, PropertyScope};
pub use store::{FilePropertyStore, MemoryPropertyStore};
