pub mod db;
pub mod embedding;
pub mod search;
