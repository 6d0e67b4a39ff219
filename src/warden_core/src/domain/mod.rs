pub mod date_of_birth;
pub mod email;
pub mod password;
pub mod role;
pub mod token;
pub mod user;
pub mod user_id;
pub mod user_name;
