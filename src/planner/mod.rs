//! Rider-facing planner: the remote planner API client, the search form
//! rules and the daily schedule carousel.

pub mod carousel;
pub mod client;
pub mod models;
pub mod search_form;

pub use carousel::{Carousel, Step};
pub use client::{PlannerClient, PlannerError};
pub use search_form::{SearchForm, SearchInput};
