//! Provider-neutral types

mod completion;
mod conversation;
mod sink;
mod stream;

pub use completion::Completion;
pub use conversation::{Content, ContentPart, Conversation, ImageUrl, Role, Turn};
pub use sink::{ChunkSink, FnSink, NullSink};
pub use stream::{StreamEvent, TextStream, Usage};
