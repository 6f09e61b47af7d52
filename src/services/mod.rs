pub mod enrichment;
pub mod history;
pub mod parser;
pub mod pipeline;
pub mod prompts;
pub mod providers;

pub use pipeline::{PipelineStage, RecommendationPipeline};
