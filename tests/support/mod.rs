#![allow(dead_code)]

pub mod chemviz_env;
pub mod mock_backend;
