pub mod password;
pub mod repositories;
