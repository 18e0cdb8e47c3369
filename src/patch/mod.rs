pub mod file;
pub mod hunk;
pub mod set;

pub use file::{ChangeKind, FileChange};
pub use hunk::{Hunk, Line, LineKind, Selection};
pub use set::PatchSet;
