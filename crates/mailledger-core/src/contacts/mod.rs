//! Contact management for autocomplete and address book functionality.

mod model;
mod repository;

pub use model::Contact;
pub use repository::ContactRepository;
