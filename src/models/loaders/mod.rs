pub mod exam_loader;

pub use exam_loader::{
    load_exam_file, load_project, save_project, save_versions, scan_source_files, ExamFile,
};
