//! Integration tests exercising the public API end to end.

mod mock_ledger;
mod simulation;
mod slip_flow;
