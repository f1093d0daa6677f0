pub mod category;
pub mod crypt;
pub mod sanitize;
pub mod settings;
