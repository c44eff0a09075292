//! Application use cases and transactions.

mod case;
mod client;
pub mod patch;
mod seed;

pub use case::{
    case_create, case_delete, case_get, case_list, case_update, CaseCreateReq, CaseDto,
    CaseListReq, CaseUpdateReq,
};
pub use client::{
    client_create, client_delete, client_get, client_list, client_update, ClientCreateReq,
    ClientDto, ClientListReq, ClientUpdateReq,
};
pub use seed::{seed_demo_data, SeedOutcome};
