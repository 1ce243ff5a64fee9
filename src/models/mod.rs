pub mod academic_year;
pub mod attestation;
pub mod department;
pub mod enums;
pub mod history;
pub mod request;
pub mod room;
pub mod software;
pub mod user;
pub mod version;
