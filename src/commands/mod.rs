pub mod chains;
pub mod contracts;
pub mod doctor;
pub mod links;
pub mod send;
pub mod status;
