pub mod delete_user;
pub mod get_user;
pub mod login;
pub mod register;
pub mod update_user;
