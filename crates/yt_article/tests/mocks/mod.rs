#![allow(dead_code)]

pub mod generator;
pub mod publisher;
pub mod transcript_source;
