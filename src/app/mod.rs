pub mod contact;
pub mod ports;
pub mod registration;
