pub mod dashboard;
pub mod gate;
pub mod handlers;
pub mod job_form;
