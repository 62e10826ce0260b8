//! A lossless codec for loose git objects.
//!
//! `Object::parse` turns an inflated object (`<kind> <len>\0<body>`) into a
//! typed `Object`; `Object::encode` writes the body back out byte for byte,
//! so `Object::id` matches the id git gave the original.
#![recursion_limit = "1024"]

#[macro_use]
extern crate error_chain;

pub mod attributes;
pub mod errors;
pub mod header;
pub mod human_metadata;
pub mod id;
pub mod objects;
pub mod stores;
