pub mod assignments;
pub mod auth;
pub mod clients;
pub mod documents;
pub mod inquiries;
pub mod portal;
pub mod tasks;
pub mod users;
