pub mod loaders;
pub mod model_code;
pub mod quiz;

pub use loaders::{load_markdown, load_quiz_document, scan_input_folder, SourceKind};
pub use model_code::{code_from_model, model_from_code, resolve_model_input};
pub use quiz::{
    count_by_type, Analysis, Distractor, OptionLabel, QuestionType, QuizDocument, QuizItem,
    QuizOptions,
};
