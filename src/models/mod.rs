// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod audit;
pub mod credential;
pub mod location;
pub mod post;
pub mod review;

pub use audit::{AuditReport, AuditRequest, AuditResponse, AuditReview};
pub use credential::{ConnectedProfile, Credential};
pub use location::{Account, BusinessLocation, LOCATION_READ_MASK};
pub use post::{CreatePostRequest, LocalPost};
pub use review::{Review, ReviewsPage, StarRating};
