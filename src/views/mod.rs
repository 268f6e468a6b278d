pub mod goals;
pub mod projects;
pub mod shell;
pub mod signup;
