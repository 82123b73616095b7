pub mod connection;
pub mod migrations;
