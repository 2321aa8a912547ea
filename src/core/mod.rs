pub mod constants;
pub mod contacts;
pub mod images;
pub mod message;
pub mod persona;
pub mod personality;
pub mod prompt;
pub mod random;
pub mod safety;
pub mod session;
pub mod settings;
pub mod storage;
