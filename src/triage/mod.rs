pub mod furry;
pub mod queues;
pub mod spam;
pub mod terms;

pub use furry::is_probably_furry;
pub use queues::{categorize, categorize_all, QueueCategory};
pub use spam::is_probably_spam;
