pub mod client;
pub mod config;
pub mod db;
pub mod web;
