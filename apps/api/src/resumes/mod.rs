// Résumé ingestion and storage: upload validation, text extraction, row and
// blob stores, sample seeding and the résumé HTTP handlers.

pub mod blobs;
pub mod extract;
pub mod handlers;
pub mod seed;
pub mod store;
