pub mod reader;
pub mod writer;

pub use reader::{decode_blob_pairs, decode_blobs, FsSourceReader};
pub use writer::FsOutputSink;
