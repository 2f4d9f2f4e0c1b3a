mod helpers;

mod auth_test;
mod bootstrap_test;
mod config_test;
mod profesional_test;
mod usuario_test;
