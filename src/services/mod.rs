pub mod enricher;
pub mod image_lookup;
pub mod inference;
pub mod orchestrator;
pub mod sanitizer;
