pub mod keys;
pub mod phone;
pub mod url;
