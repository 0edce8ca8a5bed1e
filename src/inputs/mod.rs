//! Revenue, deduction and credit line items and their loaders

mod tables;
pub mod loader;

pub use tables::{Revenues, Deductions, Credits};
pub use loader::{
    load_revenues, load_deductions, load_credits, load_collaborators,
    revenues_from_reader, deductions_from_reader, credits_from_reader,
    collaborators_from_reader,
};
