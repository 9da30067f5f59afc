pub mod job_posting;
pub mod preference;
pub mod user;
