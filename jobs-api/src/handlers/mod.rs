mod app;
mod postings;

pub use app::add_routes;
