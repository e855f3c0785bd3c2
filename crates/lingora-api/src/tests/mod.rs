//! Integration tests for the request pipeline.

mod server;
