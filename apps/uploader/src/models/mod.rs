pub mod file;
pub mod policy;

pub use file::CandidateFile;
pub use policy::ValidationPolicy;
