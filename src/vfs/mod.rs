mod dir_fs;
mod entry;
mod faulty_fs;
mod map_fs;

pub use dir_fs::DirFS;
pub(crate) use entry::{Entry, EntryType};
pub use faulty_fs::{FailurePolicy, FaultyFS};
pub use map_fs::MapFS;
