// SPDX-License-Identifier: MIT

//! Services module - business logic layer.

pub mod catalog;
pub mod email;
pub mod finder;
pub mod geo;
pub mod geocode;
pub mod google_oidc;
pub mod news;
pub mod sanitize;

pub use catalog::{CatalogSnapshot, EventCatalog};
pub use email::EmailService;
pub use geocode::GeocodeService;
pub use google_oidc::{GoogleOidcVerifier, OidcError, VerifiedGoogleUser};
pub use news::NewsService;
