// Module midi - wire codec, inbound channel, outbound dedup sink

pub mod event;
pub mod input;
pub mod output;
pub mod queue;
