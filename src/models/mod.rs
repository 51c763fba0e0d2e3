pub mod bank;
pub mod block;
pub mod exam;
pub mod loaders;
pub mod project;
pub mod question;

pub use bank::{FormMode, QuestionBank, QuestionForm, TypeCounts};
pub use block::{DocBlock, DocList, DocListItem, DocParagraph};
pub use exam::{
    group_for_display, section_ordinal, ExamDetails, ExamStyle, ExamVersion, GenerationSettings,
    HeaderSizes, QuestionSection,
};
pub use project::ExamProject;
pub use question::{Answer, DisplayType, Layout, Question, VisualType};
