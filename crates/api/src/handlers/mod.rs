pub mod architects;
pub mod assignments;
pub mod auth;
pub mod avatar;
pub mod clients;
pub mod dashboard;
pub mod photos;
pub mod users;
