//! Exact-match cache domain - keys and records

mod key;
mod record;

pub use key::{CacheKeyGenerator, Sha256KeyGenerator};
pub use record::{AnswerSource, CacheRecord};
