pub mod ai;
pub mod db;
pub mod factory;
pub mod maps;
