#![allow(dead_code)]

pub mod companion;
