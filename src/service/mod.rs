pub mod decision;
pub mod evaluation;
pub mod faithfulness;
pub mod indexer;
pub mod llm;
pub mod retrieval;

pub use decision::DecisionService;
pub use evaluation::EvaluationService;
pub use faithfulness::JudgeService;
pub use indexer::IndexBuilder;
pub use llm::LlmClient;
pub use retrieval::ClauseRetriever;
