// Résumé analysis core: catalog → normalize → match → rank → recommend → report.
// Pure and synchronous. Everything is built once at startup and shared read-only;
// handlers are the only async code in this module.

pub mod catalog;
pub mod handlers;
pub mod matcher;
pub mod normalizer;
pub mod phrases;
pub mod ranker;
pub mod recommender;
pub mod report;
