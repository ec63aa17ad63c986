//! Synchronous API client for the Forked recipe and shopping-list service.
//!
//! # Overview
//! Typed wrappers over the backend's JSON-over-HTTP surface. Every operation
//! funnels through one dispatch path that injects the bearer token, merges
//! headers, normalizes failure responses into [`ApiError`], and deserializes
//! success bodies at a typed boundary.
//!
//! # Design
//! - `ForkedClient` holds the base URL plus two ports: the credential
//!   accessor (`TokenStore`) and the round-trip executor (`HttpTransport`).
//!   Both are injectable, so dispatcher behavior is testable without a
//!   network or a browser-like host.
//! - Requests and responses are plain owned data (`http` module).
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.
//! - `LoginState` is the startup snapshot of token presence; the auth
//!   wrappers never update it.

pub mod client;
pub mod error;
pub mod http;
pub mod session;
pub mod token;
pub mod transport;
pub mod types;

pub use client::{ForkedClient, RequestOptions, DEFAULT_BASE_URL};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use session::LoginState;
pub use token::{MemoryTokenStore, NoStorage, TokenStore, AUTH_TOKEN_KEY};
pub use transport::{HttpTransport, UreqTransport};
pub use types::{
    AuthResult, CreateFromRecipe, CreateRecipe, CreateShoppingList, Ingredient, ListQuery,
    LoginRequest, PaginatedResponse, Recipe, RecipeCreator, RefreshResult, RegisterRequest,
    ShoppingList, ShoppingListItem, UpdateRecipe, UpdateShoppingList, UpdateUser, User,
};
