pub mod enrichment;
pub mod fallbacks;
pub mod generation;
pub mod prompts;
pub mod providers;
pub mod sanitize;
pub mod validation;

pub use enrichment::ImageEnricher;
pub use generation::GenerationPipeline;
