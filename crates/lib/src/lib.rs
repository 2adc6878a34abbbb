//! airq core library: the A2A adapter, the AQI agent behind it, and the
//! gateway that serves both.

pub mod a2a;
pub mod agent;
pub mod aqi;
pub mod config;
pub mod event;
pub mod gateway;
pub mod handler;
pub mod llm;
pub mod session;
