pub mod column;
pub mod record;
pub mod sanitize;
pub mod statement;
pub mod verdict;

pub use record::{Cell, PropertyRecord};
pub use verdict::{AnnotationMode, Verdict};
