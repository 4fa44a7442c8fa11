// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Upstream module - collection API backends.

pub mod mock;
pub mod postman;
mod traits;

pub use mock::MockCollectionApi;
pub use postman::PostmanClient;
pub use traits::*;
