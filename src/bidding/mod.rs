pub mod commands;
pub mod increment;
pub mod model;
pub mod validator;
