pub mod content;
pub mod project;
