use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Greeting {
    pub lang: String,
    pub greeting: String,
}

/// Rows loaded on first migration and by the in-memory store
pub const DEFAULT_GREETINGS: [(&str, &str); 7] = [
    ("en", "hello"),
    ("es", "Hola"),
    ("ar", "مرحبا"),
    ("ru", "Привет"),
    ("fi", "Hei"),
    ("he", "שלום"),
    ("ja", "こんにちは"),
];
