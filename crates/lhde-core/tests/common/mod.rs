#![allow(dead_code)]

pub mod deal_server;
