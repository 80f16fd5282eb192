pub mod chunk;
pub mod error;
pub mod request;

pub use chunk::{ChunkMetadata, ChunkType, RetrievedChunk};
pub use error::{
    DraftError, ErrorCategory, LlmError, Result, ResultExt, StoreError,
};
pub use request::{DocRequest, DraftOverrides, Override};
