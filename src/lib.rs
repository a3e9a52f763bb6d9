#![deny(clippy::expect_used, clippy::unwrap_used)]

//! The root of the messaging client core: resource lifecycles and destinations.
//! 消息客户端核心的根：资源生命周期与目的地。

pub mod config;
pub mod connection;
pub mod destination;
pub mod error;
pub mod id;
pub mod resource;

#[cfg(test)]
mod testing;
