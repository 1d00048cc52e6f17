pub mod quiz;

pub use quiz::{pick_question, ALL_CATEGORIES};
