pub mod page;
pub mod search;

pub use page::{Page, PAGE_SIZE};
pub use search::like_pattern;
