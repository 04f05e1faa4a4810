pub mod agent;
pub mod config;
pub mod db;
pub mod model;
pub mod service;
pub mod web;
