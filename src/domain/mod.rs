pub mod category;
pub mod showcase;

pub use category::{classify, Category};
pub use showcase::{languages, merge, technologies, EmptyState, Showcase, ShowcaseItem};
