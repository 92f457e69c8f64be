pub mod app;
mod deserializers;
mod extractors;
mod routes;
