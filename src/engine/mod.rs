pub mod assignment;
pub mod drafts;
pub mod lifecycle;
pub mod query;
pub mod validation;
