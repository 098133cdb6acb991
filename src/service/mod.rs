//! CrudService: generic CRUD driven by a model's serialization contract.

mod contract;
mod crud;
pub use contract::Schema;
pub use crud::CrudService;
