pub mod lecture;

pub use lecture::{Lecture, LectureSubmission, derive_flags};
