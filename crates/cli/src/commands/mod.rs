pub mod chat;
pub mod doctor;
pub mod init;
pub mod simulate;
