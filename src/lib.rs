// Library target: the quiz engine and its collaborators. The binary in
// main.rs is a thin CLI over `app::App`; integration tests and benches use
// the modules directly.

pub mod app;
pub mod audio;
pub mod config;
pub mod corpus;
pub mod session;
pub mod store;
pub mod ui;
