pub mod composition;
pub mod content;
pub mod map;
pub mod parse;
pub mod run;
