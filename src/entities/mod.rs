pub mod contact_submission;
pub mod feature;
pub mod plan;
