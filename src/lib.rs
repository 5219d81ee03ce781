pub mod config;
pub mod credentials;
pub mod error;
pub mod generators;
pub mod imaging;
pub mod mail;
pub mod records;
pub mod token;
pub mod validators;

pub use config::*;
pub use credentials::*;
pub use error::*;
pub use records::*;
pub use token::*;
