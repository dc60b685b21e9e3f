pub mod llm_service;
pub mod output_writer;
pub mod quiz_parser;
pub mod titles;

pub use llm_service::LlmService;
pub use output_writer::{
    extract_short_filename, generate_output_filename, unique_path, write_output, BatchIdGenerator,
    DEFAULT_BATCH_TIMEZONE,
};
pub use quiz_parser::QuizParser;
pub use titles::{infer_question_seed, infer_titles_from_filename, infer_titles_from_markdown, resolve_titles};
