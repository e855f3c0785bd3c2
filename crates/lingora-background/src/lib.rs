//! Background dispatcher for the action-tagged message protocol.
//!
//! One [`Dispatcher`] per process: receives [`ActionRequest`]s from the
//! popup and content scripts, drives the API pipeline, the credential store,
//! and the auth synchronizer, and always answers with an [`ActionResponse`]
//! (the transport never raises for application-level failures).
//!
//! [`ActionRequest`]: lingora_protocol::ActionRequest
//! [`ActionResponse`]: lingora_protocol::ActionResponse

mod dispatcher;

pub use dispatcher::Dispatcher;
