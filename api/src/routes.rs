pub mod dependencies;
pub mod file_tree;
pub mod files;
pub mod index;
pub mod repository;
pub mod search;
pub mod summary;
pub mod symbols;
pub mod usages;
