//! ImaraBima admin core: session lifecycle, API gateway and page models.
//!
//! SYSTEM CONTEXT
//! ==============
//! The admin shell talks to the ImaraBima REST API. `net` is the gateway and
//! its typed resources, `state` owns durable storage and the session
//! lifecycle, `app` wires them together behind the route gate, and `pages`
//! holds the view-models the shell renders.

pub mod app;
pub mod config;
pub mod net;
pub mod pages;
pub mod state;
