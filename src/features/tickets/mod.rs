//! Role-based ticket assignment.
//!
//! A ticket type fixes the category of the ticket and the company role that
//! must own it. [`TicketService`] looks up candidates in that role, applies the
//! per-type fallback and multiplicity rules, and stores the ticket. Creating a
//! `strikeOff` ticket also resolves every other open ticket of the company in
//! the same transaction.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/v1/tickets` | List all tickets with company and assignee names |
//! | POST | `/api/v1/tickets` | Create a ticket for a company |

pub mod dtos;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

pub use repositories::PgTicketStore;
pub use services::TicketService;
